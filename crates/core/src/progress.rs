//! Progress tracker - moves left, score, target

/// Value snapshot handed to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProgressSnapshot {
    pub moves_left: u32,
    pub score: u64,
    pub target: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    moves_left: u32,
    score: u64,
    target: u64,
}

impl ProgressTracker {
    pub fn new(start_moves: i64, target_score: i64) -> Self {
        let mut tracker = Self::default();
        tracker.init(start_moves, target_score);
        tracker
    }

    /// Reset for a new session; negative inputs clamp to zero
    pub fn init(&mut self, start_moves: i64, target_score: i64) {
        self.moves_left = start_moves.clamp(0, u32::MAX as i64) as u32;
        self.score = 0;
        self.target = target_score.max(0) as u64;
    }

    pub fn can_spend_move(&self) -> bool {
        self.moves_left > 0
    }

    /// No-op at zero; callers check `can_spend_move` first
    pub fn spend_move(&mut self) {
        self.moves_left = self.moves_left.saturating_sub(1);
    }

    /// Non-positive deltas are ignored
    pub fn add_score(&mut self, points: i64) {
        if points <= 0 {
            return;
        }
        self.score = self.score.saturating_add(points as u64);
    }

    pub fn is_win(&self) -> bool {
        self.score >= self.target
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            moves_left: self.moves_left,
            score: self.score,
            target: self.target,
        }
    }
}
