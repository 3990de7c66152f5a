//! Renderer boundary
//!
//! The engine never touches visuals. It hands the renderer immutable diffs
//! after each phase of model mutation and awaits the `animate_*` calls before
//! starting the next phase. Synchronous calls are fire-and-forget updates.

use std::collections::BTreeMap;

use tilematch_core::ProgressSnapshot;

use crate::types::{CellPos, Move, Spawned, TileId};

/// View side of a session (board, HUD, booster bar)
///
/// Sessions own their renderer; hand-offs are awaited in order
/// hide -> move -> spawn, so an implementation may take as long as its
/// animation needs.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    fn init_grid(&mut self, rows: usize, cols: usize);

    fn set_tile_appearance(&mut self, pos: CellPos, id: TileId);

    async fn animate_hide(&mut self, positions: &[CellPos]);

    async fn animate_move(&mut self, moves: &[Move]);

    async fn animate_spawn(&mut self, spawned: &[Spawned]);

    async fn animate_swap(&mut self, a: CellPos, b: CellPos);

    fn set_selection_highlight(&mut self, pos: CellPos, selected: bool);

    fn show_progress(&mut self, _progress: ProgressSnapshot) {}

    fn show_result(&mut self, _text: &str) {}

    fn show_charges(&mut self, _charges: &BTreeMap<String, u32>) {}

    fn show_active_booster(&mut self, _id: Option<&str>) {}
}

/// Renderer that draws nothing and completes every animation immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn init_grid(&mut self, _rows: usize, _cols: usize) {}

    fn set_tile_appearance(&mut self, _pos: CellPos, _id: TileId) {}

    async fn animate_hide(&mut self, _positions: &[CellPos]) {}

    async fn animate_move(&mut self, _moves: &[Move]) {}

    async fn animate_spawn(&mut self, _spawned: &[Spawned]) {}

    async fn animate_swap(&mut self, _a: CellPos, _b: CellPos) {}

    fn set_selection_highlight(&mut self, _pos: CellPos, _selected: bool) {}
}

/// One renderer call, as recorded by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    InitGrid { rows: usize, cols: usize },
    Appearance { pos: CellPos, id: TileId },
    Hide(Vec<CellPos>),
    Move(Vec<Move>),
    Spawn(Vec<Spawned>),
    Swap(CellPos, CellPos),
    Selection { pos: CellPos, selected: bool },
    Progress(ProgressSnapshot),
    Result(String),
    Charges(BTreeMap<String, u32>),
    ActiveBooster(Option<String>),
}

/// Renderer that records every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn last_result(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            RenderEvent::Result(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn last_progress(&self) -> Option<ProgressSnapshot> {
        self.events.iter().rev().find_map(|e| match e {
            RenderEvent::Progress(p) => Some(*p),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn init_grid(&mut self, rows: usize, cols: usize) {
        self.events.push(RenderEvent::InitGrid { rows, cols });
    }

    fn set_tile_appearance(&mut self, pos: CellPos, id: TileId) {
        self.events.push(RenderEvent::Appearance { pos, id });
    }

    async fn animate_hide(&mut self, positions: &[CellPos]) {
        self.events.push(RenderEvent::Hide(positions.to_vec()));
    }

    async fn animate_move(&mut self, moves: &[Move]) {
        self.events.push(RenderEvent::Move(moves.to_vec()));
    }

    async fn animate_spawn(&mut self, spawned: &[Spawned]) {
        self.events.push(RenderEvent::Spawn(spawned.to_vec()));
    }

    async fn animate_swap(&mut self, a: CellPos, b: CellPos) {
        self.events.push(RenderEvent::Swap(a, b));
    }

    fn set_selection_highlight(&mut self, pos: CellPos, selected: bool) {
        self.events.push(RenderEvent::Selection { pos, selected });
    }

    fn show_progress(&mut self, progress: ProgressSnapshot) {
        self.events.push(RenderEvent::Progress(progress));
    }

    fn show_result(&mut self, text: &str) {
        self.events.push(RenderEvent::Result(text.to_string()));
    }

    fn show_charges(&mut self, charges: &BTreeMap<String, u32>) {
        self.events.push(RenderEvent::Charges(charges.clone()));
    }

    fn show_active_booster(&mut self, id: Option<&str>) {
        self.events.push(RenderEvent::ActiveBooster(id.map(str::to_string)));
    }
}
