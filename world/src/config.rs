//! Match configuration loaded by adapters before the world boots.

use serde::{Deserialize, Serialize};
use station_defender_core::ItemKind;
use thiserror::Error;

/// Complete tuning for a single match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Seed for every random draw made by the world.
    pub seed: u64,
    /// Board geometry.
    pub board: BoardConfig,
    /// Alien spawning cadence and budget.
    pub spawning: SpawningConfig,
    /// Projectile shape and damage.
    pub projectile: ProjectileConfig,
    /// Rewards credited for projectile kills.
    pub rewards: RewardConfig,
    /// Player purse at the start of the match.
    pub player: PlayerConfig,
    /// Inventory snapshot read at level start.
    pub inventory: Vec<ItemStack>,
}

/// Geometry of the board, its lanes and tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Number of lanes stacked vertically.
    pub lanes: usize,
    /// Number of tiles laid out left to right in every lane.
    pub tiles_per_lane: usize,
    /// Left edge of every lane; the tower fills the space before it.
    pub origin_x: f32,
    /// Bottom edge of the first lane.
    pub origin_y: f32,
    /// Width of a tile.
    pub tile_width: f32,
    /// Height of a tile and therefore of a lane.
    pub tile_height: f32,
    /// Vertical gap left between consecutive lanes.
    pub lane_gap: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            lanes: 4,
            tiles_per_lane: 9,
            origin_x: 100.0,
            origin_y: 120.0,
            tile_width: 100.0,
            tile_height: 100.0,
            lane_gap: 50.0,
        }
    }
}

/// Which aliens a lane sends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Roster {
    /// Every alien is a generic alien.
    #[default]
    Generic,
    /// Aliens are drawn from the mixed roster and the final alien is a boss.
    Mixed,
}

/// Alien spawning cadence and budget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawningConfig {
    /// Inclusive lower bound of the randomised spawn interval.
    pub min_interval_ms: u64,
    /// Exclusive upper bound of the randomised spawn interval.
    pub max_interval_ms: u64,
    /// Inclusive lower bound of the per-lane alien budget.
    pub min_budget: u32,
    /// Exclusive upper bound of the per-lane alien budget.
    pub max_budget: u32,
    /// Alien selection policy.
    pub roster: Roster,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 2_000,
            max_interval_ms: 5_000,
            min_budget: 2,
            max_budget: 12,
            roster: Roster::Generic,
        }
    }
}

/// Projectile shape and damage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileConfig {
    /// Damage applied on every hit.
    pub damage: f64,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            damage: 50.0,
            width: 10.0,
            height: 10.0,
        }
    }
}

/// Rewards credited for a lethal projectile hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardConfig {
    /// Money credited per kill.
    pub money_per_kill: u32,
    /// Score credited per kill.
    pub score_per_kill: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            money_per_kill: 1,
            score_per_kill: 10,
        }
    }
}

/// Player purse at the start of the match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Money available for upgrades.
    pub starting_money: u32,
}

/// Quantity of a single item held in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemStack {
    /// Item held.
    pub item: ItemKind,
    /// Number of copies held.
    pub quantity: u32,
}

/// Reasons a configuration cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A board needs at least one lane.
    #[error("board must contain at least one lane")]
    NoLanes,
    /// Tiles must have a positive area.
    #[error("tile dimensions must be positive (received {width}x{height})")]
    InvalidTileSize {
        /// Configured tile width.
        width: f32,
        /// Configured tile height.
        height: f32,
    },
    /// A half-open range was empty.
    #[error("{name} range {min}..{max} is empty")]
    EmptyRange {
        /// Name of the configured range.
        name: &'static str,
        /// Inclusive lower bound.
        min: u64,
        /// Exclusive upper bound.
        max: u64,
    },
}

impl GameConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the world relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if !(self.board.tile_width > 0.0 && self.board.tile_height > 0.0) {
            return Err(ConfigError::InvalidTileSize {
                width: self.board.tile_width,
                height: self.board.tile_height,
            });
        }
        if self.spawning.min_interval_ms >= self.spawning.max_interval_ms {
            return Err(ConfigError::EmptyRange {
                name: "spawn interval",
                min: self.spawning.min_interval_ms,
                max: self.spawning.max_interval_ms,
            });
        }
        if self.spawning.min_budget >= self.spawning.max_budget {
            return Err(ConfigError::EmptyRange {
                name: "alien budget",
                min: u64::from(self.spawning.min_budget),
                max: u64::from(self.spawning.max_budget),
            });
        }
        Ok(())
    }
}
