//! Tile catalog - id to kind lookup

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::types::{Tile, TileId, TileKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileCatalog {
    by_id: BTreeMap<TileId, TileKind>,
}

impl TileCatalog {
    /// Build from `(id, kind)` entries; ids must be unique
    pub fn new(entries: impl IntoIterator<Item = (TileId, TileKind)>) -> Result<Self, ConfigError> {
        let mut by_id = BTreeMap::new();
        for (id, kind) in entries {
            if by_id.insert(id, kind).is_some() {
                return Err(ConfigError::DuplicateTileId(id));
            }
        }
        Ok(Self { by_id })
    }

    pub fn kind(&self, id: TileId) -> Option<TileKind> {
        self.by_id.get(&id).copied()
    }

    /// Construct the tile for a catalog id
    pub fn tile(&self, id: TileId) -> Option<Tile> {
        self.kind(id).map(|kind| Tile::new(id, kind))
    }

    pub fn is_super(&self, id: TileId) -> bool {
        self.kind(id).is_some_and(|kind| kind.is_super())
    }

    /// Ids of the Normal tiles, ascending
    pub fn spawn_pool(&self) -> Vec<TileId> {
        self.by_id
            .iter()
            .filter(|(_, kind)| !kind.is_super())
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
