//! Engine module - sessions, boosters and the renderer boundary
//!
//! The engine drives the pure rules in `tilematch-core`:
//!
//! - [`session`]: [`GameSession`], the `Idle -> Busy -> {Idle, GameOver}` action orchestrator
//! - [`booster`]: [`BoosterController`], charge-gated swap and super-tile tools
//! - [`renderer`]: the async [`Renderer`] trait plus null and recording implementations
//!
//! Each action mutates the model first and then awaits the renderer's animation
//! of that phase (hide, move, spawn, settle) before continuing. Actions take
//! `&mut self`, so at most one turn is ever in flight.
//!
//! # Example
//!
//! ```
//! use tilematch_core::GameConfig;
//! use tilematch_engine::{GameSession, NullRenderer, SessionState};
//!
//! tokio_test::block_on(async {
//!     let mut config = GameConfig::default();
//!     config.gameplay.settle_delay = std::time::Duration::ZERO;
//!
//!     let mut session = GameSession::new(config, NullRenderer, 1).unwrap();
//!     session.start().await;
//!     assert!(session.grid().is_full());
//!     assert!(matches!(session.state(), SessionState::Idle | SessionState::GameOver(_)));
//! });
//! ```

pub mod booster;
pub mod error;
pub mod renderer;
pub mod session;

pub use tilematch_types as types;

pub use booster::{BoosterController, ClickOutcome};
pub use error::EngineError;
pub use renderer::{NullRenderer, RecordingRenderer, RenderEvent, Renderer};
pub use session::{ActionResult, GameSession, SessionState};
