//! Session tests - click resolution, swaps, reshuffles and end conditions

mod common;

use std::time::{Duration, Instant};

use common::{board, config, session_on};
use tilematch::engine::{
    ActionResult, EngineError, GameSession, RecordingRenderer, RenderEvent, SessionState,
};
use tilematch::types::{CellPos, Outcome, DEFAULT_SETTLE_DELAY_MS};

fn position_of(events: &[RenderEvent], pred: impl Fn(&RenderEvent) -> bool) -> usize {
    events.iter().position(pred).expect("event recorded")
}

#[tokio::test]
async fn test_column_click_collects_and_refills() {
    let mut session = session_on(config(3, 1, 10, 1000), board(&[&[1], &[1], &[1]])).await;
    assert_eq!(session.state(), SessionState::Idle);

    let result = session.handle_click(CellPos::new(1, 0)).await;
    assert_eq!(result, ActionResult::Done);
    assert_eq!(session.progress().score(), 30);
    assert_eq!(session.progress().moves_left(), 9);
    assert!(session.grid().is_full());
    assert_eq!(session.grid().rows(), 3);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_small_group_is_ignored() {
    let mut session = session_on(config(2, 2, 10, 1000), board(&[&[1, 1], &[2, 3]])).await;

    let result = session.handle_click(CellPos::new(1, 0)).await;
    assert_eq!(result, ActionResult::Ignored);
    assert_eq!(session.progress().moves_left(), 10);
    assert_eq!(session.progress().score(), 0);
    assert_eq!(session.tile_id(CellPos::new(1, 0)), Some(2));
}

#[tokio::test]
async fn test_empty_and_out_of_bounds_clicks_are_ignored() {
    let mut session = session_on(config(2, 2, 10, 1000), board(&[&[1, 1], &[0, 3]])).await;
    assert_eq!(session.handle_click(CellPos::new(1, 0)).await, ActionResult::Ignored);
    assert_eq!(session.handle_click(CellPos::new(5, 5)).await, ActionResult::Ignored);
    assert_eq!(session.progress().moves_left(), 10);
}

#[tokio::test]
async fn test_last_move_without_target_loses() {
    let mut session = session_on(config(2, 2, 1, 500), board(&[&[1, 1], &[2, 3]])).await;

    let result = session.handle_click(CellPos::new(0, 0)).await;
    assert_eq!(result, ActionResult::Stopped);
    assert_eq!(session.progress().moves_left(), 0);
    assert_eq!(session.state(), SessionState::GameOver(Outcome::Loss));
    assert_eq!(session.result_text(), Some("Defeat"));
    assert_eq!(session.renderer().last_result(), Some("Defeat"));

    // game over swallows further actions
    assert_eq!(session.handle_click(CellPos::new(0, 0)).await, ActionResult::Ignored);
}

#[tokio::test]
async fn test_reaching_target_wins() {
    let mut session = session_on(config(2, 2, 1, 20), board(&[&[1, 1], &[2, 3]])).await;

    let result = session.handle_click(CellPos::new(0, 1)).await;
    assert_eq!(result, ActionResult::Stopped);
    assert_eq!(session.outcome(), Some(Outcome::Win));
    assert_eq!(session.renderer().last_result(), Some("Victory"));
}

#[tokio::test]
async fn test_click_with_no_moves_left_ends_game() {
    let mut session = session_on(config(2, 2, 0, 500), board(&[&[1, 1], &[2, 3]])).await;
    assert_eq!(session.state(), SessionState::Idle);

    let result = session.handle_click(CellPos::new(0, 0)).await;
    assert_eq!(result, ActionResult::NoMoves);
    assert_eq!(session.outcome(), Some(Outcome::Loss));
    assert_eq!(session.tile_id(CellPos::new(0, 0)), Some(1));
}

#[tokio::test]
async fn test_super_click_runs_cascade() {
    let grid = board(&[
        &[11, 1, 12],
        &[2, 3, 4],
        &[1, 2, 11],
    ]);
    let mut session = session_on(config(3, 3, 10, 1000), grid).await;
    session.renderer_mut().take_events();

    let result = session.handle_click(CellPos::new(0, 0)).await;
    assert_eq!(result, ActionResult::Done);
    assert_eq!(session.progress().score(), 70);
    assert_eq!(session.progress().moves_left(), 9);

    let events = session.renderer().events();
    let hidden = events.iter().find_map(|e| match e {
        RenderEvent::Hide(cells) => Some(cells.len()),
        _ => None,
    });
    assert_eq!(hidden, Some(7));
}

#[tokio::test]
async fn test_large_group_leaves_super_tile_at_click() {
    // five 1s in row 0 qualify for a rocket
    let grid = board(&[
        &[1, 1, 1, 1, 1],
        &[2, 3, 4, 2, 3],
    ]);
    let mut session = session_on(config(2, 5, 10, 1000), grid).await;

    let result = session.handle_click(CellPos::new(0, 2)).await;
    assert_eq!(result, ActionResult::Done);
    assert_eq!(session.progress().score(), 50);

    // the reward stays at the clicked cell; the rest of row 1 drops onto row 0
    let reward = session.grid().get(CellPos::new(0, 2)).map(|t| t.id);
    assert!(matches!(reward, Some(11) | Some(12)), "got {reward:?}");
    assert_eq!(session.tile_id(CellPos::new(0, 0)), Some(2));
}

#[tokio::test]
async fn test_phases_render_in_order() {
    let mut session = session_on(config(3, 1, 10, 1000), board(&[&[1], &[1], &[2]])).await;
    session.renderer_mut().take_events();

    session.handle_click(CellPos::new(0, 0)).await;
    let events = session.renderer().events();

    let hide = position_of(events, |e| matches!(e, RenderEvent::Hide(_)));
    let fall = position_of(events, |e| matches!(e, RenderEvent::Move(_)));
    let spawn = position_of(events, |e| matches!(e, RenderEvent::Spawn(_)));
    assert!(hide < fall && fall < spawn);

    // the surviving tile fell two rows
    match &events[fall] {
        RenderEvent::Move(moves) => {
            assert_eq!(moves.len(), 1);
            assert_eq!(moves[0].from, CellPos::new(2, 0));
            assert_eq!(moves[0].to, CellPos::new(0, 0));
        }
        other => panic!("unexpected {other:?}"),
    }
    match &events[spawn] {
        RenderEvent::Spawn(spawned) => assert_eq!(spawned.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(session.renderer().last_progress().map(|p| p.score), Some(20));
}

#[tokio::test]
async fn test_click_waits_for_settle_delay() {
    let settle = Duration::from_millis(DEFAULT_SETTLE_DELAY_MS);
    let mut cfg = config(3, 1, 10, 1000);
    cfg.gameplay.settle_delay = settle;
    let mut session = session_on(cfg, board(&[&[1], &[1], &[1]])).await;

    let started = Instant::now();
    let result = session.handle_click(CellPos::new(1, 0)).await;
    assert_eq!(result, ActionResult::Done);
    assert!(started.elapsed() >= settle, "returned after {:?}", started.elapsed());
    assert!(session.grid().is_full());
}

#[tokio::test]
async fn test_stuck_board_exhausts_reshuffles() {
    let mut session = session_on(config(2, 2, 10, 1000), board(&[&[1, 2], &[3, 4]])).await;

    // start already reshuffled once
    assert_eq!(session.reshuffles_left(), 2);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.has_any_move());

    let (a, b) = (CellPos::new(0, 0), CellPos::new(0, 1));
    assert_eq!(session.swap_tiles(a, b).await, ActionResult::Done);
    assert_eq!(session.swap_tiles(a, b).await, ActionResult::Done);
    assert_eq!(session.swap_tiles(a, b).await, ActionResult::Stopped);
    assert_eq!(session.reshuffles_left(), -1);
    assert_eq!(session.outcome(), Some(Outcome::Loss));

    // swaps spend no moves
    assert_eq!(session.progress().moves_left(), 10);
}

#[tokio::test]
async fn test_reshuffle_budget_zero_loses_at_start() {
    let mut cfg = config(2, 2, 10, 1000);
    cfg.gameplay.reshuffles = 0;
    let session = session_on(cfg, board(&[&[1, 2], &[3, 4]])).await;
    assert_eq!(session.outcome(), Some(Outcome::Loss));
    assert_eq!(session.renderer().last_result(), Some("Defeat"));
}

#[tokio::test]
async fn test_reshuffle_keeps_ids() {
    let session = session_on(config(2, 2, 10, 1000), board(&[&[1, 2], &[3, 4]])).await;
    let mut ids: Vec<_> = session.grid().occupied().map(|(_, t)| t.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    // one net relocation animation for the whole reshuffle
    let relocations = session
        .renderer()
        .events()
        .iter()
        .filter(|e| matches!(e, RenderEvent::Move(_)))
        .count();
    assert_eq!(relocations, 1);
}

#[tokio::test]
async fn test_swap_tiles_exchanges_without_resolving() {
    let mut session = session_on(config(2, 3, 10, 1000), board(&[&[1, 2, 1], &[3, 3, 4]])).await;

    let result = session.swap_tiles(CellPos::new(0, 0), CellPos::new(0, 1)).await;
    assert_eq!(result, ActionResult::Done);
    assert_eq!(session.tile_id(CellPos::new(0, 0)), Some(2));
    assert_eq!(session.tile_id(CellPos::new(0, 1)), Some(1));
    assert_eq!(session.progress().score(), 0);
    assert!(session
        .renderer()
        .events()
        .contains(&RenderEvent::Swap(CellPos::new(0, 0), CellPos::new(0, 1))));
}

#[tokio::test]
async fn test_swap_with_empty_cell_is_ignored() {
    let mut session = session_on(config(2, 2, 10, 1000), board(&[&[1, 1], &[0, 3]])).await;
    let result = session.swap_tiles(CellPos::new(0, 0), CellPos::new(1, 0)).await;
    assert_eq!(result, ActionResult::Ignored);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn test_activate_super_destroys_bomb_area() {
    let grid = board(&[
        &[1, 2, 3, 4, 1],
        &[2, 3, 4, 1, 2],
        &[3, 4, 1, 2, 3],
        &[4, 1, 2, 3, 4],
        &[1, 2, 3, 4, 1],
    ]);
    let mut session = session_on(config(5, 5, 10, 1000), grid).await;

    let result = session.activate_super_at(CellPos::new(2, 2), 10).await;
    assert_eq!(result, Ok(ActionResult::Done));
    assert_eq!(session.progress().score(), 90);
    // boosters do not spend moves
    assert_eq!(session.progress().moves_left(), 10);
    assert!(session.grid().is_full());
}

#[tokio::test]
async fn test_activate_super_rejects_bad_arguments() {
    let mut session = session_on(config(2, 2, 10, 1000), board(&[&[1, 1], &[2, 3]])).await;

    assert_eq!(
        session.activate_super_at(CellPos::new(2, 0), 10).await,
        Err(EngineError::OutOfBounds {
            pos: CellPos::new(2, 0),
            rows: 2,
            cols: 2,
        })
    );
    assert_eq!(
        session.activate_super_at(CellPos::new(0, 0), 99).await,
        Err(EngineError::UnknownTile(99))
    );
    assert_eq!(
        session.activate_super_at(CellPos::new(0, 0), 1).await,
        Err(EngineError::NotSuperTile(1))
    );
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_start_with_wrong_size_grid_fails() {
    tokio_test::block_on(async {
        let mut session =
            GameSession::new(config(3, 3, 10, 100), RecordingRenderer::new(), 1).unwrap();
        let err = session.start_with_grid(board(&[&[1, 1]])).await.unwrap_err();
        assert!(matches!(err, EngineError::GridSize { got_rows: 1, got_cols: 2, .. }));
    });
}

#[test]
fn test_start_generates_full_board() {
    tokio_test::block_on(async {
        let mut session =
            GameSession::new(config(6, 4, 10, 100), RecordingRenderer::new(), 42).unwrap();
        session.start().await;
        assert!(session.grid().is_full());
        assert!(session.grid().occupied().all(|(_, t)| !t.is_super()));
        assert_eq!(session.renderer().events()[0], RenderEvent::InitGrid { rows: 6, cols: 4 });
    });
}

#[test]
fn test_same_seed_same_game() {
    tokio_test::block_on(async {
        let mut a = GameSession::new(config(5, 5, 10, 1000), RecordingRenderer::new(), 9).unwrap();
        let mut b = GameSession::new(config(5, 5, 10, 1000), RecordingRenderer::new(), 9).unwrap();
        a.start().await;
        b.start().await;
        assert_eq!(a.grid(), b.grid());
    });
}

#[test]
fn test_restart_resets_progress() {
    tokio_test::block_on(async {
        let mut session =
            GameSession::new(config(2, 2, 0, 500), RecordingRenderer::new(), 5).unwrap();
        session.start_with_grid(board(&[&[1, 1], &[2, 3]])).await.unwrap();
        session.handle_click(CellPos::new(0, 0)).await;
        assert!(session.outcome().is_some());

        session.start_with_grid(board(&[&[1, 1], &[2, 3]])).await.unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.reshuffles_left(), 3);
        assert_eq!(session.progress().score(), 0);
    });
}
