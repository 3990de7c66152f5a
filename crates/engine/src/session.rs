//! Game session - the per-turn state machine
//!
//! A session owns the grid, the progress tracker, the reshuffle budget, the
//! RNG and the renderer. Every board-mutating action runs
//! `Idle -> Busy -> {Idle, GameOver}`; actions arriving in any other state are
//! ignored. Within an action, each phase mutates the grid first and then awaits
//! the renderer's animation of that phase before the next phase starts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use tilematch_core::{
    affected_by, BoardOps, ConfigError, GameConfig, Grid, MatchRules, ProgressTracker,
};

use crate::error::EngineError;
use crate::renderer::Renderer;
use crate::types::{CellPos, Move, Outcome, TileId, RESHUFFLE_ITERATION_CAP};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Waiting for the next action
    Idle,
    /// An action is in flight
    Busy,
    /// Ended; no further action is accepted
    GameOver(Outcome),
}

/// Terminal outcome of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionResult {
    /// Nothing happened (busy, game over, empty cell, group too small)
    Ignored,
    /// A qualifying click arrived with no moves left; the game is lost
    NoMoves,
    /// Resolved; play continues
    Done,
    /// Resolved and the game ended
    Stopped,
}

pub struct GameSession<R: Renderer> {
    config: GameConfig,
    grid: Grid,
    rules: MatchRules,
    ops: BoardOps,
    progress: ProgressTracker,
    state: SessionState,
    reshuffles_left: i32,
    rng: StdRng,
    renderer: R,
}

impl<R: Renderer> GameSession<R> {
    /// Create a session; the board stays empty until [`start`](Self::start)
    pub fn new(config: GameConfig, renderer: R, seed: u64) -> Result<Self, ConfigError> {
        let ops = BoardOps::new(config.catalog.spawn_pool())?;
        let rules = MatchRules::new(config.super_rules.clone());
        let gameplay = &config.gameplay;
        let grid = Grid::new(gameplay.rows, gameplay.cols);
        let progress = ProgressTracker::new(gameplay.start_moves, gameplay.target_score);
        let reshuffles_left = gameplay.reshuffles;

        Ok(Self {
            config,
            grid,
            rules,
            ops,
            progress,
            state: SessionState::Idle,
            reshuffles_left,
            rng: StdRng::seed_from_u64(seed),
            renderer,
        })
    }

    /// Start (or restart) with a freshly generated board
    pub async fn start(&mut self) {
        let mut grid = Grid::new(self.config.gameplay.rows, self.config.gameplay.cols);
        self.ops.generate(&mut grid, &mut self.rng);
        self.begin_session(grid).await;
    }

    /// Start (or restart) with a prepared board of the configured size
    pub async fn start_with_grid(&mut self, grid: Grid) -> Result<(), EngineError> {
        let (rows, cols) = (self.config.gameplay.rows, self.config.gameplay.cols);
        if grid.rows() != rows || grid.cols() != cols {
            return Err(EngineError::GridSize {
                rows,
                cols,
                got_rows: grid.rows(),
                got_cols: grid.cols(),
            });
        }
        self.begin_session(grid).await;
        Ok(())
    }

    async fn begin_session(&mut self, grid: Grid) {
        let gameplay = &self.config.gameplay;
        self.state = SessionState::Busy;
        self.reshuffles_left = gameplay.reshuffles;
        self.progress.init(gameplay.start_moves, gameplay.target_score);
        self.grid = grid;

        self.renderer.init_grid(self.grid.rows(), self.grid.cols());
        for (pos, tile) in self.grid.occupied() {
            self.renderer.set_tile_appearance(pos, tile.id);
        }
        self.renderer.show_progress(self.progress.snapshot());
        info!(
            rows = self.grid.rows(),
            cols = self.grid.cols(),
            moves = self.progress.moves_left(),
            target = self.progress.target(),
            "session started"
        );

        if self.try_shuffle_to_get_move().await {
            self.end_game(Outcome::Loss);
        } else {
            self.state = SessionState::Idle;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy_or_over(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            SessionState::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// "Victory" or "Defeat" once the game has ended
    pub fn result_text(&self) -> Option<&'static str> {
        self.outcome().map(|o| o.result_text())
    }

    /// Whether the current board has a legal move
    pub fn has_any_move(&self) -> bool {
        self.rules.has_any_move(&self.grid)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn reshuffles_left(&self) -> i32 {
        self.reshuffles_left
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn tile_id(&self, pos: CellPos) -> Option<TileId> {
        self.grid.tile_id(pos)
    }

    pub fn set_selection(&mut self, pos: CellPos, selected: bool) {
        self.renderer.set_selection_highlight(pos, selected);
    }

    /// Collect the group under `pos` (player click)
    #[instrument(skip(self))]
    pub async fn handle_click(&mut self, pos: CellPos) -> ActionResult {
        if !self.begin() {
            return ActionResult::Ignored;
        }
        let result = self.collect(pos).await;
        self.finish();
        debug!(?result, "click resolved");
        result
    }

    /// Exchange two occupied cells. Spends no move and destroys nothing;
    /// matches the swap creates wait for the next click.
    #[instrument(skip(self))]
    pub async fn swap_tiles(&mut self, a: CellPos, b: CellPos) -> ActionResult {
        if !self.begin() {
            return ActionResult::Ignored;
        }
        if !self.grid.is_occupied(a) || !self.grid.is_occupied(b) {
            self.finish();
            return ActionResult::Ignored;
        }

        self.grid.swap(a, b);
        self.renderer.animate_swap(a, b).await;
        let keep_playing = self.after_board_action().await;
        self.finish();
        if keep_playing {
            ActionResult::Done
        } else {
            ActionResult::Stopped
        }
    }

    /// Spawn `super_id` at `pos` (overwriting the cell) and fire it with its cascade.
    ///
    /// Not gated by the move budget.
    #[instrument(skip(self))]
    pub async fn activate_super_at(
        &mut self,
        pos: CellPos,
        super_id: TileId,
    ) -> Result<ActionResult, EngineError> {
        if self.state != SessionState::Idle {
            return Ok(ActionResult::Ignored);
        }
        if !self.grid.contains(pos) {
            return Err(EngineError::OutOfBounds {
                pos,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            });
        }
        let tile = self
            .config
            .catalog
            .tile(super_id)
            .ok_or(EngineError::UnknownTile(super_id))?;
        if !tile.is_super() {
            return Err(EngineError::NotSuperTile(super_id));
        }

        self.state = SessionState::Busy;
        self.grid.set(pos, Some(tile));
        self.renderer.set_tile_appearance(pos, super_id);

        let initial = affected_by(&tile, &self.grid, pos);
        let group = self.rules.expand_super_group(&self.grid, &initial, pos);
        if group.is_empty() {
            self.finish();
            return Ok(ActionResult::Ignored);
        }

        let keep_playing = self.resolve_after_destroy(&group, None).await;
        self.finish();
        Ok(if keep_playing {
            ActionResult::Done
        } else {
            ActionResult::Stopped
        })
    }

    fn begin(&mut self) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.state = SessionState::Busy;
        true
    }

    fn finish(&mut self) {
        if self.state == SessionState::Busy {
            self.state = SessionState::Idle;
        }
    }

    async fn collect(&mut self, pos: CellPos) -> ActionResult {
        let Some(tile) = self.grid.get(pos).copied() else {
            return ActionResult::Ignored;
        };
        let mut group = affected_by(&tile, &self.grid, pos);
        let is_normal = !tile.is_super();
        if !self.rules.can_collect(is_normal, group.len()) {
            return ActionResult::Ignored;
        }
        if !self.progress.can_spend_move() {
            self.end_game(Outcome::Loss);
            return ActionResult::NoMoves;
        }

        self.progress.spend_move();
        self.renderer.show_progress(self.progress.snapshot());

        let spawn = if is_normal {
            self.rules
                .pick_super_id(group.len(), &mut self.rng)
                .map(|id| (pos, id))
        } else {
            group = self.rules.expand_super_group(&self.grid, &group, pos);
            None
        };
        debug!(seed = %pos, size = group.len(), ?spawn, "group collected");

        if self.resolve_after_destroy(&group, spawn).await {
            ActionResult::Done
        } else {
            ActionResult::Stopped
        }
    }

    /// Shared tail of every destroying action. Returns false once the game ended.
    async fn resolve_after_destroy(
        &mut self,
        group: &[CellPos],
        spawn: Option<(CellPos, TileId)>,
    ) -> bool {
        self.renderer.animate_hide(group).await;

        let gained = group.len() as i64 * self.config.gameplay.score_per_tile as i64;
        self.progress.add_score(gained);
        self.renderer.show_progress(self.progress.snapshot());

        for &pos in group {
            self.grid.set(pos, None);
        }

        if let Some((pos, id)) = spawn {
            match self.config.catalog.tile(id) {
                Some(tile) => {
                    self.grid.set(pos, Some(tile));
                    self.renderer.set_tile_appearance(pos, id);
                }
                None => warn!(id, "reward tile missing from catalog"),
            }
        }

        let moves = self.ops.move_down(&mut self.grid);
        self.renderer.animate_move(&moves).await;

        let spawned = self.ops.fill_empty(&mut self.grid, &mut self.rng);
        for s in &spawned {
            self.renderer.set_tile_appearance(s.pos, s.id);
        }
        self.renderer.animate_spawn(&spawned).await;

        let settle = self.config.gameplay.settle_delay;
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        self.after_board_action().await
    }

    async fn after_board_action(&mut self) -> bool {
        if self.check_end_conditions() {
            return false;
        }
        if self.try_shuffle_to_get_move().await {
            self.end_game(Outcome::Loss);
            return false;
        }
        true
    }

    fn check_end_conditions(&mut self) -> bool {
        if self.progress.is_win() {
            self.end_game(Outcome::Win);
            return true;
        }
        if !self.progress.can_spend_move() {
            self.end_game(Outcome::Loss);
            return true;
        }
        false
    }

    /// Reshuffle when no move exists. Returns true once the budget is exhausted.
    ///
    /// The budget drops by one per stuck board. Up to `RESHUFFLE_ITERATION_CAP`
    /// extra shuffles search for an arrangement with a move; the renderer then
    /// animates the net relocation once.
    async fn try_shuffle_to_get_move(&mut self) -> bool {
        if !self.rules.has_any_move(&self.grid) {
            self.reshuffles_left -= 1;
            warn!(reshuffles_left = self.reshuffles_left, "no legal move, reshuffling");

            // origins[i]: where the tile now at flat index i started
            let mut origins: Vec<CellPos> = self.grid.positions().collect();
            self.reshuffle_once(&mut origins);

            let mut attempts = 0u32;
            while !self.rules.has_any_move(&self.grid) && attempts < RESHUFFLE_ITERATION_CAP {
                attempts += 1;
                self.reshuffle_once(&mut origins);
            }
            if attempts == RESHUFFLE_ITERATION_CAP && !self.rules.has_any_move(&self.grid) {
                warn!(attempts, "reshuffle cap reached without a legal move");
            }

            let relocations: Vec<Move> = self
                .grid
                .positions()
                .zip(origins)
                .filter(|(to, from)| to != from)
                .map(|(to, from)| Move { from, to })
                .collect();
            self.renderer.animate_move(&relocations).await;
        }
        self.reshuffles_left < 0
    }

    fn reshuffle_once(&mut self, origins: &mut [CellPos]) {
        let moves = self.ops.shuffle_tiles(&mut self.grid, &mut self.rng);
        let before = origins.to_vec();
        for m in moves {
            if let (Some(from), Some(to)) = (self.grid.index_of(m.from), self.grid.index_of(m.to)) {
                origins[to] = before[from];
            }
        }
    }

    fn end_game(&mut self, outcome: Outcome) {
        self.state = SessionState::GameOver(outcome);
        self.renderer.show_result(outcome.result_text());
        info!(
            ?outcome,
            score = self.progress.score(),
            target = self.progress.target(),
            moves_left = self.progress.moves_left(),
            "session ended"
        );
    }
}
