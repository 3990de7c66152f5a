//! Headless tile-match runner (default binary).
//!
//! Plays one session with a greedy autoplayer and logs every renderer hand-off.
//!
//! Environment:
//!
//! - `TILEMATCH_CONFIG`: bundle file or directory of config documents (built-in default otherwise)
//! - `TILEMATCH_SEED`: RNG seed (default 1)
//! - `TILEMATCH_MAX_TURNS`: stop after this many clicks (default 200)
//! - `RUST_LOG`: tracing filter (default `info`)

use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tilematch::core::{affected_by, GameConfig, Grid, ProgressSnapshot};
use tilematch::engine::{BoosterController, ClickOutcome, GameSession, Renderer};
use tilematch::types::{BoosterKind, CellPos, Move, Spawned, TileId};

const DEFAULT_MAX_TURNS: u32 = 200;

/// Try a super booster every this many turns
const BOOSTER_EVERY: u32 = 7;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match env::var("TILEMATCH_CONFIG") {
        Ok(path) => GameConfig::from_path(&path)
            .with_context(|| format!("loading config from {path}"))?,
        Err(_) => GameConfig::default(),
    };
    let seed: u64 = env_parse("TILEMATCH_SEED")?.unwrap_or(1);
    let max_turns: u32 = env_parse("TILEMATCH_MAX_TURNS")?.unwrap_or(DEFAULT_MAX_TURNS);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(run(config, seed, max_turns))
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => {
            let value = raw.trim().parse().with_context(|| format!("invalid {key}: {raw:?}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

async fn run(config: GameConfig, seed: u64, max_turns: u32) -> Result<()> {
    let mut boosters = BoosterController::new(&config.boosters);
    let super_booster = config
        .boosters
        .iter()
        .find(|b| matches!(b.kind, BoosterKind::Super { .. }))
        .map(|b| b.id.clone());

    let mut session =
        GameSession::new(config, LogRenderer::default(), seed).context("creating session")?;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));

    session.start().await;
    boosters.init_charges(&mut session);

    let mut turn = 0;
    while !session.is_busy_or_over() && turn < max_turns {
        turn += 1;

        if let Some(id) = super_booster.as_deref() {
            if turn % BOOSTER_EVERY == 0 && boosters.charges_of(id).unwrap_or(0) > 0 {
                let grid = session.grid();
                let pos = CellPos::new(
                    rng.random_range(0..grid.rows()),
                    rng.random_range(0..grid.cols()),
                );
                boosters.set_active(&mut session, Some(id));
                let outcome = boosters.handle_cell_click(&mut session, pos).await;
                info!(turn, booster = id, %pos, ?outcome, "booster turn");
                continue;
            }
        }

        let Some((pos, size)) = best_click(&session) else {
            info!(turn, "no collectable group");
            break;
        };
        let outcome = boosters.handle_cell_click(&mut session, pos).await;
        debug!(turn, %pos, size, ?outcome, "click turn");
        if outcome == ClickOutcome::Ignored {
            break;
        }
    }

    let progress = session.progress().snapshot();
    println!("{}", render_board(session.grid()));
    println!(
        "turns: {turn}  score: {}/{}  moves left: {}  reshuffles left: {}",
        progress.score,
        progress.target,
        progress.moves_left,
        session.reshuffles_left()
    );
    println!("boosters left: {:?}", boosters.charges());
    println!("result: {}", session.result_text().unwrap_or("Unfinished"));
    println!("animations: {}", session.renderer().animations);
    Ok(())
}

/// Largest resolvable click; super tiles count their full cascade
fn best_click<R: Renderer>(session: &GameSession<R>) -> Option<(CellPos, usize)> {
    let grid = session.grid();
    let rules = session.rules();
    grid.occupied()
        .filter_map(|(pos, tile)| {
            let group = affected_by(tile, grid, pos);
            if !rules.can_collect(!tile.is_super(), group.len()) {
                return None;
            }
            let size = if tile.is_super() {
                rules.expand_super_group(grid, &group, pos).len()
            } else {
                group.len()
            };
            Some((pos, size))
        })
        .max_by_key(|&(_, size)| size)
}

/// Top row first, `.` for empty cells
fn render_board(grid: &Grid) -> String {
    let ids = grid.ids();
    let mut out = String::new();
    for row in ids.iter().rev() {
        for cell in row {
            match cell {
                Some(id) => out.push_str(&format!("{id:>3}")),
                None => out.push_str("  ."),
            }
        }
        out.push('\n');
    }
    out
}

/// Renderer that logs each hand-off instead of drawing
#[derive(Debug, Default)]
struct LogRenderer {
    animations: usize,
}

impl Renderer for LogRenderer {
    fn init_grid(&mut self, rows: usize, cols: usize) {
        debug!(rows, cols, "init grid");
    }

    fn set_tile_appearance(&mut self, _pos: CellPos, _id: TileId) {}

    async fn animate_hide(&mut self, positions: &[CellPos]) {
        self.animations += 1;
        debug!(count = positions.len(), "hide");
    }

    async fn animate_move(&mut self, moves: &[Move]) {
        self.animations += 1;
        debug!(count = moves.len(), "move");
    }

    async fn animate_spawn(&mut self, spawned: &[Spawned]) {
        self.animations += 1;
        debug!(count = spawned.len(), "spawn");
    }

    async fn animate_swap(&mut self, a: CellPos, b: CellPos) {
        self.animations += 1;
        debug!(%a, %b, "swap");
    }

    fn set_selection_highlight(&mut self, pos: CellPos, selected: bool) {
        debug!(%pos, selected, "selection");
    }

    fn show_progress(&mut self, progress: ProgressSnapshot) {
        debug!(
            moves_left = progress.moves_left,
            score = progress.score,
            target = progress.target,
            "progress"
        );
    }

    fn show_result(&mut self, text: &str) {
        info!(result = text, "game over");
    }

    fn show_charges(&mut self, charges: &BTreeMap<String, u32>) {
        debug!(?charges, "charges");
    }
}
