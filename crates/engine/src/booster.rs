//! Booster controller - limited-use tools that reinterpret board clicks
//!
//! | Kind  | Gesture                         | Consumes a charge           |
//! |-------|---------------------------------|-----------------------------|
//! | Swap  | tap first cell, tap second cell | when the swap succeeds      |
//! | Super | tap one cell                    | on every completed tap      |
//!
//! While no booster is active, clicks go straight to
//! [`GameSession::handle_click`].

use std::collections::BTreeMap;

use tracing::{debug, error, info};

use crate::error::EngineError;
use crate::renderer::Renderer;
use crate::session::{ActionResult, GameSession};
use crate::types::{BoosterKind, CellPos, TileId};
use tilematch_core::BoosterSpec;

/// What a routed click did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickOutcome {
    /// Session busy or over
    Ignored,
    /// No booster active; the click went to the board
    Board(ActionResult),
    /// Swap booster remembered its first cell
    Selected,
    /// Swap booster dropped its first cell (same cell, empty cell or same id)
    Cancelled,
    /// Active booster had no charges left and was deselected
    Deselected,
    /// Booster completed and spent a charge
    Used(ActionResult),
    /// Booster failed; no charge spent, booster stays active
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Gesture {
    Swap { first: Option<CellPos> },
    Super { super_tile_id: TileId },
}

enum Step {
    Pending,
    Cancelled,
    Completed(ActionResult),
}

#[derive(Debug, Clone)]
struct Booster {
    id: String,
    gesture: Gesture,
}

impl Booster {
    fn new(spec: &BoosterSpec) -> Self {
        let gesture = match spec.kind {
            BoosterKind::Swap => Gesture::Swap { first: None },
            BoosterKind::Super { super_tile_id } => Gesture::Super { super_tile_id },
        };
        Self {
            id: spec.id.clone(),
            gesture,
        }
    }

    fn reset<R: Renderer>(&mut self, session: &mut GameSession<R>) {
        if let Gesture::Swap { first } = &mut self.gesture {
            if let Some(pos) = first.take() {
                session.set_selection(pos, false);
            }
        }
    }

    async fn on_cell_click<R: Renderer>(
        &mut self,
        session: &mut GameSession<R>,
        pos: CellPos,
    ) -> Result<Step, EngineError> {
        match &mut self.gesture {
            Gesture::Swap { first } => {
                let Some(a) = first.take() else {
                    *first = Some(pos);
                    session.set_selection(pos, true);
                    return Ok(Step::Pending);
                };
                session.set_selection(a, false);
                if a == pos {
                    return Ok(Step::Cancelled);
                }
                match (session.tile_id(a), session.tile_id(pos)) {
                    (Some(id_a), Some(id_b)) if id_a != id_b => {
                        let result = session.swap_tiles(a, pos).await;
                        Ok(Step::Completed(result))
                    }
                    // empty cell or same id
                    _ => Ok(Step::Cancelled),
                }
            }
            Gesture::Super { super_tile_id } => {
                let result = session.activate_super_at(pos, *super_tile_id).await?;
                Ok(Step::Completed(result))
            }
        }
    }
}

/// Owns booster charges and the active selection
#[derive(Debug, Clone)]
pub struct BoosterController {
    boosters: Vec<Booster>,
    initial: BTreeMap<String, u32>,
    charges: BTreeMap<String, u32>,
    active: Option<String>,
}

impl BoosterController {
    pub fn new(specs: &[BoosterSpec]) -> Self {
        let boosters = specs.iter().map(Booster::new).collect();
        let initial: BTreeMap<String, u32> =
            specs.iter().map(|s| (s.id.clone(), s.charges)).collect();
        Self {
            boosters,
            charges: initial.clone(),
            initial,
            active: None,
        }
    }

    /// Restore configured charges, clear any selection and publish both
    pub fn init_charges<R: Renderer>(&mut self, session: &mut GameSession<R>) {
        self.charges = self.initial.clone();
        session.renderer_mut().show_charges(&self.charges);
        self.set_active(session, None);
    }

    /// Remaining charges per booster id
    pub fn charges(&self) -> &BTreeMap<String, u32> {
        &self.charges
    }

    pub fn charges_of(&self, id: &str) -> Option<u32> {
        self.charges.get(id).copied()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Make `id` the active booster, or deselect with `None`.
    ///
    /// Every booster's half-finished gesture is dropped. Returns false (and
    /// changes nothing) for an id that is not configured.
    pub fn set_active<R: Renderer>(
        &mut self,
        session: &mut GameSession<R>,
        id: Option<&str>,
    ) -> bool {
        if let Some(id) = id {
            if !self.charges.contains_key(id) {
                return false;
            }
        }
        for booster in &mut self.boosters {
            booster.reset(session);
        }
        self.active = id.map(str::to_string);
        session.renderer_mut().show_active_booster(id);
        debug!(active = ?self.active, "active booster changed");
        true
    }

    /// Activate `id`, or deselect it if it is already active
    pub fn toggle<R: Renderer>(&mut self, session: &mut GameSession<R>, id: &str) -> bool {
        if self.active.as_deref() == Some(id) {
            self.set_active(session, None)
        } else {
            self.set_active(session, Some(id))
        }
    }

    /// Route a board click through the active booster, or to the session
    pub async fn handle_cell_click<R: Renderer>(
        &mut self,
        session: &mut GameSession<R>,
        pos: CellPos,
    ) -> ClickOutcome {
        if session.is_busy_or_over() {
            return ClickOutcome::Ignored;
        }
        let Some(active_id) = self.active.clone() else {
            return ClickOutcome::Board(session.handle_click(pos).await);
        };

        let left = self.charges.get(&active_id).copied().unwrap_or(0);
        if left == 0 {
            self.set_active(session, None);
            return ClickOutcome::Deselected;
        }

        let Some(booster) = self.boosters.iter_mut().find(|b| b.id == active_id) else {
            return ClickOutcome::Ignored;
        };

        match booster.on_cell_click(session, pos).await {
            Ok(Step::Pending) => ClickOutcome::Selected,
            Ok(Step::Cancelled) => ClickOutcome::Cancelled,
            Ok(Step::Completed(result)) => {
                self.charges.insert(active_id.clone(), left - 1);
                session.renderer_mut().show_charges(&self.charges);
                info!(booster = %active_id, charges_left = left - 1, ?result, "booster used");
                self.set_active(session, None);
                ClickOutcome::Used(result)
            }
            Err(err) => {
                error!(booster = %active_id, %pos, error = %err, "booster failed");
                ClickOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RecordingRenderer, RenderEvent};
    use tilematch_core::{GameConfig, Grid};
    use crate::types::Tile;

    fn session() -> GameSession<RecordingRenderer> {
        let mut config = GameConfig::default();
        config.gameplay.rows = 2;
        config.gameplay.cols = 2;
        config.gameplay.settle_delay = std::time::Duration::ZERO;
        GameSession::new(config, RecordingRenderer::new(), 7).unwrap()
    }

    fn board() -> Grid {
        let t = |id| Some(Tile::normal(id));
        Grid::from_rows(vec![vec![t(1), t(1)], vec![t(2), t(3)]]).unwrap()
    }

    #[test]
    fn test_unknown_booster_not_activated() {
        let mut s = session();
        let mut ctl = BoosterController::new(&s.config().boosters.clone());
        assert!(!ctl.set_active(&mut s, Some("nope")));
        assert_eq!(ctl.active(), None);
    }

    #[test]
    fn test_toggle_deselects() {
        let mut s = session();
        let mut ctl = BoosterController::new(&s.config().boosters.clone());
        assert!(ctl.toggle(&mut s, "swap"));
        assert_eq!(ctl.active(), Some("swap"));
        ctl.toggle(&mut s, "swap");
        assert_eq!(ctl.active(), None);
    }

    #[test]
    fn test_same_id_tap_cancels() {
        tokio_test::block_on(async {
            let mut s = session();
            s.start_with_grid(board()).await.unwrap();
            let mut ctl = BoosterController::new(&s.config().boosters.clone());
            ctl.set_active(&mut s, Some("swap"));

            assert_eq!(
                ctl.handle_cell_click(&mut s, CellPos::new(0, 0)).await,
                ClickOutcome::Selected
            );
            assert_eq!(
                ctl.handle_cell_click(&mut s, CellPos::new(0, 1)).await,
                ClickOutcome::Cancelled
            );
            assert_eq!(ctl.charges_of("swap"), Some(3));
            assert_eq!(ctl.active(), Some("swap"));
            assert_eq!(s.tile_id(CellPos::new(0, 0)), Some(1));
        });
    }

    #[test]
    fn test_empty_cell_tap_cancels() {
        tokio_test::block_on(async {
            let mut s = session();
            let mut grid = board();
            grid.set(CellPos::new(1, 1), None);
            s.start_with_grid(grid).await.unwrap();
            let mut ctl = BoosterController::new(&s.config().boosters.clone());
            ctl.set_active(&mut s, Some("swap"));

            assert_eq!(
                ctl.handle_cell_click(&mut s, CellPos::new(1, 0)).await,
                ClickOutcome::Selected
            );
            assert_eq!(
                ctl.handle_cell_click(&mut s, CellPos::new(1, 1)).await,
                ClickOutcome::Cancelled
            );
            assert_eq!(ctl.charges_of("swap"), Some(3));
        });
    }

    #[test]
    fn test_switching_booster_drops_selection() {
        tokio_test::block_on(async {
            let mut s = session();
            s.start_with_grid(board()).await.unwrap();
            let mut ctl = BoosterController::new(&s.config().boosters.clone());
            ctl.set_active(&mut s, Some("swap"));
            ctl.handle_cell_click(&mut s, CellPos::new(1, 0)).await;
            s.renderer_mut().take_events();

            ctl.set_active(&mut s, Some("bomb"));
            assert_eq!(
                s.renderer().events(),
                &[
                    RenderEvent::Selection {
                        pos: CellPos::new(1, 0),
                        selected: false,
                    },
                    RenderEvent::ActiveBooster(Some("bomb".to_string())),
                ]
            );

            ctl.set_active(&mut s, Some("swap"));
            // a fresh gesture: this tap selects instead of swapping
            assert_eq!(
                ctl.handle_cell_click(&mut s, CellPos::new(1, 1)).await,
                ClickOutcome::Selected
            );
        });
    }
}
