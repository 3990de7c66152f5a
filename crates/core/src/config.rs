//! Configuration - JSON documents and the validated `GameConfig`
//!
//! The documents mirror the game's four config assets (`tile_catalog`,
//! `super_rules`, `boosters`, `gameplay`), either bundled in one JSON object
//! or as four files in a directory. [`GameConfig::from_bundle`] validates a
//! bundle and normalizes it into the form the engine consumes.
//!
//! # Examples
//!
//! ```
//! use tilematch_core::config::GameConfig;
//!
//! let json = r#"{
//!     "tileCatalog": { "tiles": [
//!         { "id": 1, "kind": "normal" },
//!         { "id": 2, "kind": "normal" },
//!         { "id": 9, "kind": "bomb", "radius": 1 }
//!     ]},
//!     "superRules": { "minGroupToDestroy": 2, "rules": [{ "minGroup": 5, "spawnIds": [9] }] },
//!     "gameplay": {
//!         "rows": 6, "cols": 6, "startMoves": 20, "targetScore": 300, "scorePerTile": 10
//!     }
//! }"#;
//!
//! let config = GameConfig::from_json_str(json).unwrap();
//! assert_eq!(config.catalog.spawn_pool(), vec![1, 2]);
//! assert_eq!(config.gameplay.reshuffles, 3);
//! assert!(config.boosters.is_empty());
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::TileCatalog;
use crate::error::ConfigError;
use crate::rules::{SuperRule, SuperTileRules};
use crate::types::{BoosterKind, TileId, TileKind, DEFAULT_RESHUFFLES, DEFAULT_SETTLE_DELAY_MS};

// ============== Documents ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKindDoc {
    Normal,
    Bomb,
    RocketRow,
    RocketCol,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDef {
    pub id: TileId,
    pub kind: TileKindDoc,
    /// Required for bombs, ignored otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    /// Resource path of the tile's sprite (renderer concern)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileCatalogDoc {
    pub tiles: Vec<TileDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperRuleDoc {
    pub min_group: usize,
    pub spawn_ids: Vec<TileId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperRulesDoc {
    pub min_group_to_destroy: usize,
    pub rules: Vec<SuperRuleDoc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoosterKindDoc {
    Swap,
    Super,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoosterDef {
    pub id: String,
    pub kind: BoosterKindDoc,
    pub charges: u32,
    /// Required for super boosters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_tile_id: Option<TileId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoostersDoc {
    pub boosters: Vec<BoosterDef>,
}

fn default_reshuffles() -> i32 {
    DEFAULT_RESHUFFLES
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameplayDoc {
    pub rows: i64,
    pub cols: i64,
    pub start_moves: i64,
    pub target_score: i64,
    pub score_per_tile: i64,
    #[serde(default = "default_reshuffles")]
    pub reshuffles: i32,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

/// All four documents in one JSON object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigBundle {
    pub tile_catalog: TileCatalogDoc,
    pub super_rules: SuperRulesDoc,
    #[serde(default)]
    pub boosters: BoostersDoc,
    pub gameplay: GameplayDoc,
}

impl ConfigBundle {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load `tile_catalog.json`, `super_rules.json`, `boosters.json` (optional)
    /// and `gameplay.json` from a directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let boosters_path = dir.join("boosters.json");
        let boosters = if boosters_path.exists() {
            read_json(&boosters_path)?
        } else {
            BoostersDoc::default()
        };
        Ok(Self {
            tile_catalog: read_json(&dir.join("tile_catalog.json"))?,
            super_rules: read_json(&dir.join("super_rules.json"))?,
            boosters,
            gameplay: read_json(&dir.join("gameplay.json"))?,
        })
    }
}

impl Default for ConfigBundle {
    /// Built-in 8x8 game: four colours, two rockets, two bombs, a swap and a bomb booster
    fn default() -> Self {
        let normal = |id: TileId, sprite: &str| TileDef {
            id,
            kind: TileKindDoc::Normal,
            radius: None,
            sprite: Some(sprite.to_string()),
        };
        Self {
            tile_catalog: TileCatalogDoc {
                tiles: vec![
                    normal(1, "tiles/blue"),
                    normal(2, "tiles/green"),
                    normal(3, "tiles/purple"),
                    normal(4, "tiles/red"),
                    TileDef {
                        id: 10,
                        kind: TileKindDoc::Bomb,
                        radius: Some(1),
                        sprite: Some("tiles/bomb".to_string()),
                    },
                    TileDef {
                        id: 11,
                        kind: TileKindDoc::RocketRow,
                        radius: None,
                        sprite: Some("tiles/rocket_row".to_string()),
                    },
                    TileDef {
                        id: 12,
                        kind: TileKindDoc::RocketCol,
                        radius: None,
                        sprite: Some("tiles/rocket_col".to_string()),
                    },
                    TileDef {
                        id: 13,
                        kind: TileKindDoc::Bomb,
                        radius: Some(2),
                        sprite: Some("tiles/bomb_max".to_string()),
                    },
                ],
            },
            super_rules: SuperRulesDoc {
                min_group_to_destroy: 2,
                rules: vec![
                    SuperRuleDoc {
                        min_group: 5,
                        spawn_ids: vec![11, 12],
                    },
                    SuperRuleDoc {
                        min_group: 7,
                        spawn_ids: vec![10],
                    },
                    SuperRuleDoc {
                        min_group: 9,
                        spawn_ids: vec![13],
                    },
                ],
            },
            boosters: BoostersDoc {
                boosters: vec![
                    BoosterDef {
                        id: "swap".to_string(),
                        kind: BoosterKindDoc::Swap,
                        charges: 3,
                        super_tile_id: None,
                    },
                    BoosterDef {
                        id: "bomb".to_string(),
                        kind: BoosterKindDoc::Super,
                        charges: 2,
                        super_tile_id: Some(13),
                    },
                ],
            },
            gameplay: GameplayDoc {
                rows: 8,
                cols: 8,
                start_moves: 30,
                target_score: 500,
                score_per_tile: 10,
                reshuffles: DEFAULT_RESHUFFLES,
                settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            },
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

// ============== Validated config ==============

/// A booster ready for the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoosterSpec {
    pub id: String,
    pub kind: BoosterKind,
    pub charges: u32,
}

/// Gameplay parameters after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gameplay {
    pub rows: usize,
    pub cols: usize,
    /// Clamped to >= 0 by the progress tracker
    pub start_moves: i64,
    /// Clamped to >= 0 by the progress tracker
    pub target_score: i64,
    pub score_per_tile: u32,
    pub reshuffles: i32,
    pub settle_delay: Duration,
}

/// Validated, normalized configuration of one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub catalog: TileCatalog,
    pub super_rules: SuperTileRules,
    pub boosters: Vec<BoosterSpec>,
    pub gameplay: Gameplay,
}

impl GameConfig {
    pub fn from_bundle(bundle: ConfigBundle) -> Result<Self, ConfigError> {
        let catalog = build_catalog(&bundle.tile_catalog)?;
        if catalog.spawn_pool().is_empty() {
            return Err(ConfigError::EmptySpawnPool);
        }

        let super_rules = build_super_rules(&bundle.super_rules, &catalog)?;
        let boosters = build_boosters(&bundle.boosters, &catalog)?;
        let gameplay = build_gameplay(&bundle.gameplay)?;

        tracing::debug!(
            tiles = catalog.len(),
            rules = super_rules.rules().len(),
            boosters = boosters.len(),
            rows = gameplay.rows,
            cols = gameplay.cols,
            "config validated"
        );

        Ok(Self {
            catalog,
            super_rules,
            boosters,
            gameplay,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_bundle(ConfigBundle::from_json_str(json)?)
    }

    /// Load a bundle file, or a directory of the four documents
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bundle = if path.is_dir() {
            ConfigBundle::from_dir(path)?
        } else {
            read_json(path)?
        };
        Self::from_bundle(bundle)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_bundle(ConfigBundle::default()).expect("built-in config is valid")
    }
}

fn build_catalog(doc: &TileCatalogDoc) -> Result<TileCatalog, ConfigError> {
    let mut entries = Vec::with_capacity(doc.tiles.len());
    for def in &doc.tiles {
        let kind = match def.kind {
            TileKindDoc::Normal => TileKind::Normal,
            TileKindDoc::Bomb => TileKind::Bomb {
                radius: def.radius.ok_or(ConfigError::MissingBombRadius(def.id))?,
            },
            TileKindDoc::RocketRow => TileKind::RocketRow,
            TileKindDoc::RocketCol => TileKind::RocketCol,
        };
        entries.push((def.id, kind));
    }
    TileCatalog::new(entries)
}

fn check_super_id(catalog: &TileCatalog, id: TileId) -> Result<(), ConfigError> {
    match catalog.kind(id) {
        None => Err(ConfigError::UnknownTileId(id)),
        Some(kind) if !kind.is_super() => Err(ConfigError::NotSuperTile(id)),
        Some(_) => Ok(()),
    }
}

fn build_super_rules(
    doc: &SuperRulesDoc,
    catalog: &TileCatalog,
) -> Result<SuperTileRules, ConfigError> {
    for rule in &doc.rules {
        for &id in &rule.spawn_ids {
            check_super_id(catalog, id)?;
        }
    }
    let rules = doc
        .rules
        .iter()
        .map(|rule| SuperRule {
            min_group: rule.min_group,
            spawn_ids: rule.spawn_ids.clone(),
        })
        .collect();
    SuperTileRules::new(doc.min_group_to_destroy, rules)
}

fn build_boosters(
    doc: &BoostersDoc,
    catalog: &TileCatalog,
) -> Result<Vec<BoosterSpec>, ConfigError> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(doc.boosters.len());
    for def in &doc.boosters {
        if !seen.insert(def.id.as_str()) {
            return Err(ConfigError::DuplicateBoosterId(def.id.clone()));
        }
        let kind = match def.kind {
            BoosterKindDoc::Swap => BoosterKind::Swap,
            BoosterKindDoc::Super => {
                let super_tile_id = def
                    .super_tile_id
                    .ok_or_else(|| ConfigError::MissingSuperTileId(def.id.clone()))?;
                check_super_id(catalog, super_tile_id)?;
                BoosterKind::Super { super_tile_id }
            }
        };
        out.push(BoosterSpec {
            id: def.id.clone(),
            kind,
            charges: def.charges,
        });
    }
    Ok(out)
}

fn build_gameplay(doc: &GameplayDoc) -> Result<Gameplay, ConfigError> {
    if doc.rows <= 0 || doc.cols <= 0 {
        return Err(ConfigError::InvalidDimensions {
            rows: doc.rows,
            cols: doc.cols,
        });
    }
    if doc.score_per_tile <= 0 || doc.score_per_tile > u32::MAX as i64 {
        return Err(ConfigError::InvalidScorePerTile(doc.score_per_tile));
    }
    Ok(Gameplay {
        rows: doc.rows as usize,
        cols: doc.cols as usize,
        start_moves: doc.start_moves,
        target_score: doc.target_score,
        score_per_tile: doc.score_per_tile as u32,
        reshuffles: doc.reshuffles,
        settle_delay: Duration::from_millis(doc.settle_delay_ms),
    })
}
