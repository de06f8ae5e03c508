#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Station Defender engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Station Defender.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one frame of the provided duration.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests placement of an inventory item at a world-space point.
    PlaceItem {
        /// Item drawn from the player's inventory.
        item: ItemKind,
        /// World-space point selected by the player.
        at: Point,
    },
    /// Requests a paid upgrade of a placed weapon.
    UpgradeWeapon {
        /// Identifier of the weapon to upgrade.
        unit: UnitId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the frame.
        dt: Duration,
    },
    /// Confirms that a lane spawned a new alien at its rightmost tile.
    AlienSpawned {
        /// Lane that owns the alien.
        lane: LaneId,
        /// Identifier allocated to the alien.
        unit: UnitId,
        /// Variant of the spawned alien.
        kind: AlienKind,
    },
    /// Confirms that an inventory item was placed as a unit.
    UnitPlaced {
        /// Lane that received the unit.
        lane: LaneId,
        /// Identifier allocated to the unit.
        unit: UnitId,
        /// Item consumed by the placement.
        item: ItemKind,
        /// Footprint of the placed unit.
        bounds: Bounds,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Item requested for placement.
        item: ItemKind,
        /// Point provided in the placement request.
        at: Point,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that a weapon finished construction.
    WeaponBuilt {
        /// Identifier of the weapon.
        unit: UnitId,
    },
    /// Confirms that a weapon upgrade was purchased.
    WeaponUpgraded {
        /// Identifier of the upgraded weapon.
        unit: UnitId,
        /// Damage after the upgrade.
        damage: f64,
        /// Price of the next upgrade.
        cost_to_upgrade: u32,
    },
    /// Reports that an upgrade request was rejected.
    UpgradeRejected {
        /// Identifier provided in the request.
        unit: UnitId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a unit requested a projectile from its lane.
    ProjectileFired {
        /// Lane that owns the projectile.
        lane: LaneId,
        /// Point at which the projectile entered the lane.
        origin: Point,
    },
    /// Announces that a unit left its lane's live set.
    UnitDestroyed {
        /// Lane that owned the unit.
        lane: LaneId,
        /// Identifier of the destroyed unit.
        unit: UnitId,
        /// Variant of the destroyed unit.
        kind: UnitKind,
        /// Reason the unit was removed.
        cause: DestructionCause,
        /// Last footprint of the unit, used to position destruction effects.
        bounds: Bounds,
    },
    /// Reports that a lethal projectile hit credited the player.
    KillRewarded {
        /// Lane in which the kill happened.
        lane: LaneId,
        /// Unit that was killed.
        unit: UnitId,
        /// Money credited to the player.
        money: u32,
        /// Score credited to the player.
        score: u32,
    },
    /// Announces that an enemy reached the tower through the lane.
    LaneOverrun {
        /// Lane that was overrun.
        lane: LaneId,
    },
    /// Announces that a lane has no remaining threat.
    LaneCleared {
        /// Lane that was cleared.
        lane: LaneId,
    },
    /// Announces the end of the match.
    GameOver {
        /// Final result of the match.
        outcome: Outcome,
    },
}

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(u32);

impl LaneId {
    /// Creates a new lane identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// World-space point measured in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate; the tower sits at low values.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its lower-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Horizontal coordinate of the anchor corner.
    pub x: f32,
    /// Vertical coordinate of the anchor corner.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Bounds {
    /// Creates a new rectangle from its anchor and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether the two rectangles share interior area.
    ///
    /// Rectangles that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        other.x + other.width > self.x
            && other.x < self.x + self.width
            && other.y + other.height > self.y
            && other.y < self.y + self.height
    }

    /// Reports whether a single-pixel probe at `point` overlaps the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.overlaps(&Bounds::new(point.x, point.y, 1.0, 1.0))
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Right-hand edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns a copy of the rectangle with its centre moved to `center`.
    #[must_use]
    pub fn centered_on(self, center: Point) -> Self {
        Self {
            x: center.x - self.width / 2.0,
            y: center.y - self.height / 2.0,
            ..self
        }
    }

    /// Shortest horizontal gap between the two rectangles, zero when they overlap.
    #[must_use]
    pub fn horizontal_gap(&self, other: &Bounds) -> f32 {
        if other.x >= self.right() {
            other.x - self.right()
        } else if self.x >= other.right() {
            self.x - other.right()
        } else {
            0.0
        }
    }
}

/// Direction a unit travels relative to the defended tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Travels toward the tower; enemies face this way.
    TowardTower,
    /// Travels away from the tower; the player's units face this way.
    AwayFromTower,
}

impl Facing {
    /// Sign applied to speeds along the horizontal axis.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::TowardTower => -1.0,
            Self::AwayFromTower => 1.0,
        }
    }

    /// Reports whether two facings belong to opposing sides.
    #[must_use]
    pub fn opposes(self, other: Facing) -> bool {
        self != other
    }
}

/// Behavioural variants of the alien unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienKind {
    /// Standard alien that trades blows when engaged.
    Generic,
    /// Single-use attacker that self-destructs after striking.
    Kamikaze,
    /// Stationary trap that strikes at range while not engaged.
    Mine,
    /// Fires in bursts followed by a one-cycle overload.
    RapidFire,
    /// Durable melee alien.
    CloseCombat,
    /// Heavy alien closing out a mixed wave.
    Boss,
}

impl AlienKind {
    /// Aliens that may appear in a mixed spawn roster.
    pub const ROSTER: [AlienKind; 4] = [
        AlienKind::Generic,
        AlienKind::CloseCombat,
        AlienKind::Kamikaze,
        AlienKind::RapidFire,
    ];

    /// Display name of the variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "Alien",
            Self::Kamikaze => "Kamikaze Alien",
            Self::Mine => "Mine",
            Self::RapidFire => "Rapid Fire Alien",
            Self::CloseCombat => "Close Combat Alien",
            Self::Boss => "Boss Alien",
        }
    }
}

/// Behavioural variants of the player-built weapon unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Default turret firing projectiles down the lane.
    Standard,
    /// Turret that alternates bursts with a one-cycle overload.
    RapidFire,
    /// Short-ranged, hard-hitting emplacement.
    CloseCombat,
}

impl WeaponKind {
    /// Display name of the variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "Weapon",
            Self::RapidFire => "Rapid Fire Weapon",
            Self::CloseCombat => "Close Combat Weapon",
        }
    }
}

/// Closed set of combatant variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Alien-family unit.
    Alien(AlienKind),
    /// Weapon-family unit.
    Weapon(WeaponKind),
}

impl UnitKind {
    /// Display name of the variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alien(kind) => kind.name(),
            Self::Weapon(kind) => kind.name(),
        }
    }

    /// Reports whether the unit is a mine.
    #[must_use]
    pub fn is_mine(self) -> bool {
        self == Self::Alien(AlienKind::Mine)
    }
}

/// Items the player can hold in the inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Places a standard weapon.
    Weapon,
    /// Places a rapid-fire weapon.
    RapidFireTurret,
    /// Places a close-combat weapon.
    CloseCombatWeapon,
    /// Places a mine.
    Mine,
    /// Currency pickup that cannot be placed.
    Credit,
}

impl ItemKind {
    /// Display name of the item.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::RapidFireTurret => "Rapid Fire Turret",
            Self::CloseCombatWeapon => "Close Combat Weapon",
            Self::Mine => "Mine",
            Self::Credit => "Credit",
        }
    }

    /// Shop price of the item.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Weapon => 10,
            Self::RapidFireTurret => 15,
            Self::CloseCombatWeapon => 50,
            Self::Mine => 10,
            Self::Credit => 0,
        }
    }

    /// Unit produced when the item is placed, if the item is placeable.
    #[must_use]
    pub const fn placeable_unit(self) -> Option<UnitKind> {
        match self {
            Self::Weapon => Some(UnitKind::Weapon(WeaponKind::Standard)),
            Self::RapidFireTurret => Some(UnitKind::Weapon(WeaponKind::RapidFire)),
            Self::CloseCombatWeapon => Some(UnitKind::Weapon(WeaponKind::CloseCombat)),
            Self::Mine => Some(UnitKind::Alien(AlienKind::Mine)),
            Self::Credit => None,
        }
    }
}

/// Reason a unit left its lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Health reached zero through damage.
    Killed,
    /// The unit destroyed itself after delivering its strike.
    SelfDestructed,
    /// The unit collided with the tower.
    ReachedTower,
}

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every lane was cleared.
    Won,
    /// At least one lane was overrun.
    Lost,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// No lane contains the requested point.
    #[error("no eligible lane contains the requested point")]
    NoEligibleLane,
    /// The lane contains the point but no tile does.
    #[error("no tile lies under the requested point")]
    NoTileAtPoint,
    /// A live unit already overlaps the tile.
    #[error("the tile is already occupied")]
    TileOccupied,
    /// The tile is marked as unavailable for placement.
    #[error("the tile is marked invalid for placement")]
    InvalidTile,
    /// The inventory holds none of the requested item.
    #[error("the item is not available in the inventory")]
    ItemUnavailable,
    /// The item does not produce a unit.
    #[error("the item cannot be placed")]
    NotPlaceable,
}

/// Reasons an upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No placed weapon carries the identifier.
    #[error("no weapon with the requested identifier exists")]
    MissingWeapon,
    /// The player cannot afford the upgrade.
    #[error("upgrade costs {required} but only {available} is available")]
    InsufficientFunds {
        /// Price of the upgrade.
        required: u32,
        /// Money held by the player.
        available: u32,
    },
}

/// Failure to resolve a 1-based lane or tile index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum LookupError {
    /// The index does not address an existing entry.
    #[error("index {index} is out of bounds for {len} entries")]
    IndexOutOfBounds {
        /// Requested 1-based index.
        index: usize,
        /// Number of entries available.
        len: usize,
    },
}

/// Sink that receives the player's rewards.
pub trait PlayerSink {
    /// Credits money to the player.
    fn add_money(&mut self, amount: u32);

    /// Credits score to the player.
    fn add_score(&mut self, amount: u32);
}

/// Immutable representation of a single unit's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Unique identifier assigned to the unit.
    pub id: UnitId,
    /// Lane that owns the unit.
    pub lane: LaneId,
    /// Variant of the unit.
    pub kind: UnitKind,
    /// Current footprint.
    pub bounds: Bounds,
    /// Side the unit fights for.
    pub facing: Facing,
    /// Remaining health.
    pub health: f64,
    /// Damage dealt per successful roll.
    pub damage: f64,
    /// Unit currently judged adjacent, if any.
    pub adjacent: Option<UnitId>,
    /// Construction state; aliens are always built.
    pub built: bool,
    /// Seconds of construction remaining.
    pub remaining_build_time: f64,
    /// Price of the next upgrade for weapons.
    pub cost_to_upgrade: Option<u32>,
}

impl UnitSnapshot {
    /// Reports whether the unit is engaged with an adjacent unit.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.adjacent.is_some()
    }
}

/// Read-only snapshot describing every live unit on the board.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    snapshots: Vec<UnitSnapshot>,
}

impl UnitView {
    /// Creates a new unit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured unit snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a unit by identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Returns the topmost unit whose footprint contains `point`.
    #[must_use]
    pub fn unit_at(&self, point: Point) -> Option<&UnitSnapshot> {
        self.snapshots
            .iter()
            .rev()
            .find(|snapshot| snapshot.bounds.contains(point))
    }
}
