//! Match rules - collect thresholds, super-tile rewards, cascades, move detection
//!
//! The rule table is sorted by descending `min_group` at construction, so the
//! first matching rule always is the most generous one the group qualifies for.

use rand::Rng;

use crate::error::ConfigError;
use crate::grid::Grid;
use crate::tiles::{affected_by, connected_group};
use crate::types::{CellPos, TileId, MIN_GROUP_FLOOR};

/// One reward rule: groups of at least `min_group` spawn one of `spawn_ids`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperRule {
    pub min_group: usize,
    pub spawn_ids: Vec<TileId>,
}

/// Super-tile rule table plus the global destroy threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperTileRules {
    min_group_to_destroy: usize,
    /// Sorted by descending `min_group`
    rules: Vec<SuperRule>,
}

impl SuperTileRules {
    pub fn new(
        min_group_to_destroy: usize,
        mut rules: Vec<SuperRule>,
    ) -> Result<Self, ConfigError> {
        if min_group_to_destroy < MIN_GROUP_FLOOR {
            return Err(ConfigError::MinGroupTooSmall(min_group_to_destroy));
        }
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleTable);
        }
        for rule in &rules {
            if rule.min_group == 0 {
                return Err(ConfigError::ZeroRuleThreshold);
            }
            if rule.spawn_ids.is_empty() {
                return Err(ConfigError::EmptySpawnIds(rule.min_group));
            }
        }
        // Stable: rules with equal thresholds keep their config order.
        rules.sort_by(|a, b| b.min_group.cmp(&a.min_group));
        Ok(Self {
            min_group_to_destroy,
            rules,
        })
    }

    pub fn rules(&self) -> &[SuperRule] {
        &self.rules
    }

    /// Super-tile id rewarded for a Normal group of `group_size`, if any
    pub fn pick_spawn_id<R: Rng + ?Sized>(&self, group_size: usize, rng: &mut R) -> Option<TileId> {
        let rule = self.rules.iter().find(|rule| group_size >= rule.min_group)?;
        let idx = rng.random_range(0..rule.spawn_ids.len());
        Some(rule.spawn_ids[idx])
    }
}

/// Board-level rules built on the super-tile table
#[derive(Debug, Clone)]
pub struct MatchRules {
    super_rules: SuperTileRules,
}

impl MatchRules {
    pub fn new(super_rules: SuperTileRules) -> Self {
        Self { super_rules }
    }

    /// Super seeds always resolve; Normal seeds need a large enough group
    pub fn can_collect(&self, is_normal_seed: bool, group_size: usize) -> bool {
        !is_normal_seed || group_size >= self.super_rules.min_group_to_destroy
    }

    pub fn pick_super_id<R: Rng + ?Sized>(&self, group_size: usize, rng: &mut R) -> Option<TileId> {
        self.super_rules.pick_spawn_id(group_size, rng)
    }

    /// Grow `initial_group` by the affected sets of every super tile it reaches.
    ///
    /// `seed` counts as already activated. Each super-tile position activates at
    /// most once (tracked apart from the collected set), so adjacent super tiles
    /// cannot re-trigger each other. Returns the de-duplicated union in discovery order.
    pub fn expand_super_group(
        &self,
        grid: &Grid,
        initial_group: &[CellPos],
        seed: CellPos,
    ) -> Vec<CellPos> {
        let mut activated = vec![false; grid.len()];
        let mut collected = vec![false; grid.len()];
        if let Some(idx) = grid.index_of(seed) {
            activated[idx] = true;
        }

        let mut group = Vec::with_capacity(initial_group.len());
        let mut stack: Vec<CellPos> = initial_group.iter().rev().copied().collect();

        while let Some(pos) = stack.pop() {
            let Some(idx) = grid.index_of(pos) else {
                continue;
            };
            if !collected[idx] {
                collected[idx] = true;
                group.push(pos);
            }
            let Some(tile) = grid.get(pos) else {
                continue;
            };
            if tile.is_super() && !activated[idx] {
                activated[idx] = true;
                let mut chained = affected_by(tile, grid, pos);
                chained.reverse();
                stack.extend(chained);
            }
        }

        group
    }

    /// True if some occupied cell is a legal click.
    ///
    /// Any super tile qualifies (it always resolves); Normal tiles qualify through
    /// group size. Each Normal component is flooded once.
    pub fn has_any_move(&self, grid: &Grid) -> bool {
        let mut seen = vec![false; grid.len()];
        for (pos, tile) in grid.occupied() {
            if tile.is_super() {
                return true;
            }
            let Some(idx) = grid.index_of(pos) else {
                continue;
            };
            if seen[idx] {
                continue;
            }
            let group = connected_group(grid, pos);
            if group.len() >= self.super_rules.min_group_to_destroy {
                return true;
            }
            for member in group {
                if let Some(i) = grid.index_of(member) {
                    seen[i] = true;
                }
            }
        }
        false
    }
}
