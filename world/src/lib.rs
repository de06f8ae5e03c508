#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Station Defender.
//!
//! The world owns the board, the player's purse and inventory, and the seeded
//! random source every combat roll draws from. Adapters mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module.

mod alien;
mod board;
mod config;
pub mod factory;
mod lane;
mod player;
mod projectile;
mod spawning;
mod tile;
mod unit;
mod weapon;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use station_defender_core::{
    Bounds, Command, Event, ItemKind, LaneId, PlacementError, Point, UnitId, UpgradeError,
    WELCOME_BANNER,
};
use tracing::{debug, info};

pub use board::Board;
pub use config::{
    BoardConfig, ConfigError, GameConfig, ItemStack, PlayerConfig, ProjectileConfig, RewardConfig,
    Roster, SpawningConfig,
};
pub use lane::{Lane, TickContext};
pub use player::{Inventory, Player};
pub use projectile::{Projectile, ProjectileFactory};
pub use spawning::SpawnSchedule;
pub use tile::Tile;
pub use unit::{Action, CombatStats, Partner, Unit, UnitCallback, UnitIds};

/// Represents the authoritative Station Defender world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    board: Board,
    player: Player,
    ids: UnitIds,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(GameConfig::default())
    }

    /// Creates a world from a validated configuration.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GameConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let board = Board::new(&config, &mut rng);
        let player = Player::new(&config.player, &config.inventory);
        info!(
            seed = config.seed,
            lanes = board.lanes().len(),
            "world ready"
        );
        Self {
            banner: WELCOME_BANNER,
            board,
            player,
            ids: UnitIds::default(),
            rng,
            config,
            tick_index: 0,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            let mut ctx = TickContext::new(
                &mut world.rng,
                &mut world.player,
                &mut world.ids,
                out_events,
            );
            world.board.tick(dt, &mut ctx);
        }
        Command::PlaceItem { item, at } => match place_item(world, item, at) {
            Ok((lane, unit, bounds)) => {
                info!(lane = lane.get(), unit = unit.get(), item = item.name(), "item placed");
                out_events.push(Event::UnitPlaced {
                    lane,
                    unit,
                    item,
                    bounds,
                });
            }
            Err(reason) => {
                debug!(item = item.name(), %reason, "placement rejected");
                out_events.push(Event::PlacementRejected { item, at, reason });
            }
        },
        Command::UpgradeWeapon { unit } => match upgrade_weapon(world, unit) {
            Ok((damage, cost_to_upgrade)) => {
                info!(unit = unit.get(), damage, cost_to_upgrade, "weapon upgraded");
                out_events.push(Event::WeaponUpgraded {
                    unit,
                    damage,
                    cost_to_upgrade,
                });
            }
            Err(reason) => {
                debug!(unit = unit.get(), %reason, "upgrade rejected");
                out_events.push(Event::UpgradeRejected { unit, reason });
            }
        },
    }
}

fn place_item(
    world: &mut World,
    item: ItemKind,
    at: Point,
) -> Result<(LaneId, UnitId, Bounds), PlacementError> {
    let kind = item.placeable_unit().ok_or(PlacementError::NotPlaceable)?;
    if world.player.inventory().quantity(item) == 0 {
        return Err(PlacementError::ItemUnavailable);
    }
    let unit = factory::defender(world.ids.allocate(), kind);
    let (lane, id) = world.board.place(unit, at)?;
    let _ = world.player.inventory_mut().take(item);
    let bounds = world
        .board
        .unit(id)
        .map(|(_, unit)| unit.bounds())
        .unwrap_or_default();
    Ok((lane, id, bounds))
}

fn upgrade_weapon(world: &mut World, id: UnitId) -> Result<(f64, u32), UpgradeError> {
    let weapon = world
        .board
        .unit_mut(id)
        .ok_or(UpgradeError::MissingWeapon)?;
    let required = weapon
        .cost_to_upgrade()
        .ok_or(UpgradeError::MissingWeapon)?;
    let available = world.player.money();
    if !world.player.spend(required) {
        return Err(UpgradeError::InsufficientFunds {
            required,
            available,
        });
    }
    weapon.upgrade_weapon().ok_or(UpgradeError::MissingWeapon)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use station_defender_core::{Bounds, LaneId, Outcome, UnitView};

    use super::{Board, GameConfig, Player, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Area the enemies are trying to reach.
    #[must_use]
    pub fn tower(world: &World) -> Bounds {
        world.board.tower()
    }

    /// The player's purse and inventory.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Result of the match once decided.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.board.outcome()
    }

    /// Number of ticks applied so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of every live unit.
    #[must_use]
    pub fn unit_view(world: &World) -> UnitView {
        UnitView::from_snapshots(
            world
                .board
                .lanes()
                .iter()
                .flat_map(|lane| lane.snapshot_units())
                .collect(),
        )
    }

    /// Status of a single lane.
    #[derive(Clone, Debug, PartialEq)]
    pub struct LaneSnapshot {
        /// Identifier of the lane.
        pub id: LaneId,
        /// Area spanned by the lane's tiles.
        pub bounds: Bounds,
        /// Whether an enemy reached the tower through the lane.
        pub overrun: bool,
        /// Whether the lane's threat has been dealt with.
        pub cleared: bool,
        /// Aliens the lane has yet to spawn.
        pub remaining_aliens: u32,
    }

    /// Captures the status of every lane in bottom-to-top order.
    #[must_use]
    pub fn lanes(world: &World) -> Vec<LaneSnapshot> {
        world
            .board
            .lanes()
            .iter()
            .map(|lane| LaneSnapshot {
                id: lane.id(),
                bounds: lane.bounds(),
                overrun: lane.is_overrun(),
                cleared: lane.is_cleared(),
                remaining_aliens: lane.remaining_aliens(),
            })
            .collect()
    }

    /// Placement state of a single tile.
    #[derive(Clone, Debug, PartialEq)]
    pub struct TileSnapshot {
        /// Lane that owns the tile.
        pub lane: LaneId,
        /// 1-based position within the lane.
        pub index: usize,
        /// Area covered by the tile.
        pub bounds: Bounds,
        /// Whether a live unit overlaps the tile.
        pub occupied: bool,
        /// Whether placement is forbidden.
        pub invalid: bool,
        /// Whether a pickup rests on the tile.
        pub has_item: bool,
    }

    /// Captures every tile on the board, lane by lane.
    #[must_use]
    pub fn tiles(world: &World) -> Vec<TileSnapshot> {
        world
            .board
            .lanes()
            .iter()
            .flat_map(|lane| {
                lane.tiles()
                    .iter()
                    .enumerate()
                    .map(move |(position, tile)| TileSnapshot {
                        lane: lane.id(),
                        index: position + 1,
                        bounds: tile.bounds(),
                        occupied: lane.is_tile_occupied(position + 1).unwrap_or(false),
                        invalid: tile.is_invalid(),
                        has_item: tile.has_item(),
                    })
            })
            .collect()
    }

    /// Footprints of every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<Bounds> {
        world
            .board
            .lanes()
            .iter()
            .flat_map(|lane| lane.projectiles().projectiles())
            .map(|projectile| projectile.bounds())
            .collect()
    }
}
