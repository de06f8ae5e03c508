//! Per-row orchestration of tiles, units, spawns and projectiles.

use std::time::Duration;

use rand::RngCore;
use station_defender_core::{
    Bounds, DestructionCause, Event, Facing, LaneId, LookupError, PlacementError, PlayerSink,
    Point, UnitId, UnitSnapshot,
};
use tracing::{debug, info};

use crate::{
    config::{GameConfig, RewardConfig},
    factory,
    projectile::ProjectileFactory,
    spawning::SpawnSchedule,
    tile::Tile,
    unit::{Action, Partner, Unit, UnitIds},
};

/// Collaborators a lane borrows while it ticks.
pub struct TickContext<'a> {
    rng: &'a mut dyn RngCore,
    player: &'a mut dyn PlayerSink,
    ids: &'a mut UnitIds,
    events: &'a mut Vec<Event>,
}

impl<'a> TickContext<'a> {
    /// Bundles the random source, reward sink, identifier allocator and event buffer.
    pub fn new(
        rng: &'a mut dyn RngCore,
        player: &'a mut dyn PlayerSink,
        ids: &'a mut UnitIds,
        events: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            rng,
            player,
            ids,
            events,
        }
    }

    pub(crate) fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// One horizontal row of the board, holding tiles, units and projectiles.
#[derive(Clone, Debug)]
pub struct Lane {
    id: LaneId,
    bounds: Bounds,
    tiles: Vec<Tile>,
    units: Vec<Unit>,
    projectiles: ProjectileFactory,
    spawner: SpawnSchedule,
    tower: Bounds,
    rewards: RewardConfig,
    overrun: bool,
    cleared: bool,
}

impl Lane {
    /// Lays out a lane whose first tile is anchored at `origin`.
    pub fn new(
        id: LaneId,
        origin: Point,
        tower: Bounds,
        config: &GameConfig,
        rng: &mut dyn RngCore,
    ) -> Self {
        let board = &config.board;
        let tiles = (0..board.tiles_per_lane)
            .map(|column| {
                Tile::new(Bounds::new(
                    origin.x + column as f32 * board.tile_width,
                    origin.y,
                    board.tile_width,
                    board.tile_height,
                ))
            })
            .collect();
        let mut lane = Self {
            id,
            bounds: Bounds::new(origin.x, origin.y, 0.0, board.tile_height),
            tiles,
            units: Vec::new(),
            projectiles: ProjectileFactory::new(&config.projectile),
            spawner: SpawnSchedule::new(&config.spawning, rng),
            tower,
            rewards: config.rewards.clone(),
            overrun: false,
            cleared: false,
        };
        lane.refresh_bounds();
        lane
    }

    fn refresh_bounds(&mut self) {
        let Some(first) = self.tiles.first() else {
            self.bounds.width = 0.0;
            return;
        };
        let left = self
            .tiles
            .iter()
            .map(|tile| tile.bounds().x)
            .fold(first.bounds().x, f32::min);
        let right = self
            .tiles
            .iter()
            .map(|tile| tile.bounds().right())
            .fold(first.bounds().right(), f32::max);
        let bottom = self
            .tiles
            .iter()
            .map(|tile| tile.bounds().y)
            .fold(first.bounds().y, f32::min);
        let top = self
            .tiles
            .iter()
            .map(|tile| tile.bounds().y + tile.bounds().height)
            .fold(first.bounds().y + first.bounds().height, f32::max);
        self.bounds = Bounds::new(left, bottom, right - left, top - bottom);
    }

    /// Identifier of the lane.
    #[must_use]
    pub const fn id(&self) -> LaneId {
        self.id
    }

    /// Area spanned by the lane's tiles.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Reports whether an enemy has reached the tower through this lane.
    #[must_use]
    pub const fn is_overrun(&self) -> bool {
        self.overrun
    }

    /// Reports whether the lane's threat has been dealt with.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Aliens the lane has yet to spawn.
    #[must_use]
    pub const fn remaining_aliens(&self) -> u32 {
        self.spawner.remaining()
    }

    /// Tiles in left-to-right order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Live units in insertion order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Projectile pool owned by the lane.
    #[must_use]
    pub const fn projectiles(&self) -> &ProjectileFactory {
        &self.projectiles
    }

    fn check_index(&self, index: usize) -> Result<usize, LookupError> {
        if index == 0 || index > self.tiles.len() {
            return Err(LookupError::IndexOutOfBounds {
                index,
                len: self.tiles.len(),
            });
        }
        Ok(index - 1)
    }

    /// Looks up a tile by its 1-based position.
    pub fn tile(&self, index: usize) -> Result<&Tile, LookupError> {
        let position = self.check_index(index)?;
        Ok(&self.tiles[position])
    }

    /// Mutable access to a tile by its 1-based position.
    pub fn tile_mut(&mut self, index: usize) -> Result<&mut Tile, LookupError> {
        let position = self.check_index(index)?;
        Ok(&mut self.tiles[position])
    }

    /// Removes and returns the tile at the 1-based position.
    pub fn remove_tile_by_index(&mut self, index: usize) -> Result<Tile, LookupError> {
        let position = self.check_index(index)?;
        let tile = self.tiles.remove(position);
        self.refresh_bounds();
        Ok(tile)
    }

    /// Appends a tile to the right end of the lane.
    pub fn add_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
        self.refresh_bounds();
    }

    /// Reports whether the rectangle shares interior area with the lane.
    #[must_use]
    pub fn is_colliding(&self, other: &Bounds) -> bool {
        self.bounds.overlaps(other)
    }

    /// Reports whether any live unit overlaps the tile at the 1-based position.
    pub fn is_tile_occupied(&self, index: usize) -> Result<bool, LookupError> {
        let tile = self.tile(index)?;
        Ok(self.units.iter().any(|unit| tile.is_colliding(&unit.bounds())))
    }

    /// Centre of the rightmost tile, where aliens enter the lane.
    #[must_use]
    pub fn last_tile_center(&self) -> Option<Point> {
        self.tiles.last().map(Tile::center)
    }

    /// Reports whether no live unit faces the tower.
    #[must_use]
    pub fn is_lane_cleared(&self) -> bool {
        !self
            .units
            .iter()
            .any(|unit| unit.facing() == Facing::TowardTower)
    }

    /// Looks up a live unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|unit| unit.id() == id)
    }

    /// Centres `unit` on the tile under `at` and adds it to the live set.
    pub fn place(&mut self, mut unit: Unit, at: Point) -> Result<UnitId, PlacementError> {
        let index = self
            .tiles
            .iter()
            .position(|tile| tile.contains(at))
            .ok_or(PlacementError::NoTileAtPoint)?;
        let tile = &self.tiles[index];
        if tile.is_invalid() {
            return Err(PlacementError::InvalidTile);
        }
        let footprint = tile.bounds();
        if self
            .units
            .iter()
            .any(|other| footprint.overlaps(&other.bounds()))
        {
            return Err(PlacementError::TileOccupied);
        }
        unit.set_center(tile.center());
        let id = unit.id();
        self.units.push(unit);
        Ok(id)
    }

    /// Advances the lane by one frame.
    pub fn tick(&mut self, dt: Duration, ctx: &mut TickContext<'_>) {
        self.recompute_adjacency();
        self.act(dt, ctx);
        self.check_overrun(ctx.events);
        self.sweep_dead(ctx.events);
        self.spawn(dt, ctx);
        self.advance_projectiles(dt, ctx);
        self.check_cleared(ctx.events);
    }

    /// Pairs every live unit with at most one overlapping unit.
    ///
    /// An overlapping opponent is preferred; otherwise the first overlapping ally in insertion
    /// order is recorded. Units without overlap end the pass with no partner.
    fn recompute_adjacency(&mut self) {
        let partners: Vec<Option<UnitId>> = (0..self.units.len())
            .map(|index| self.find_partner(index))
            .collect();
        for (unit, partner) in self.units.iter_mut().zip(partners) {
            unit.set_adjacent_actor(partner);
        }
    }

    fn find_partner(&self, index: usize) -> Option<UnitId> {
        let unit = &self.units[index];
        if unit.check_zero_health() {
            return None;
        }
        let mut ally = None;
        for (other_index, other) in self.units.iter().enumerate() {
            if other_index == index || other.check_zero_health() || !unit.is_unit_adjacent(other)
            {
                continue;
            }
            if unit.facing().opposes(other.facing()) {
                return Some(other.id());
            }
            if ally.is_none() {
                ally = Some(other.id());
            }
        }
        ally
    }

    fn act(&mut self, dt: Duration, ctx: &mut TickContext<'_>) {
        for index in 0..self.units.len() {
            if self.units[index].check_zero_health() {
                continue;
            }
            let partner = self.units[index]
                .adjacent_actor()
                .and_then(|id| self.unit(id))
                .map(Partner::of);
            let was_built = self.units[index].is_built();
            let shots_before = self.projectiles.len();

            let unit = &mut self.units[index];
            let action = unit.act(dt, partner, &mut self.projectiles, &mut *ctx.rng);

            if !was_built && unit.is_built() {
                info!(lane = self.id.get(), unit = unit.id().get(), "weapon built");
                ctx.events.push(Event::WeaponBuilt { unit: unit.id() });
            }
            for projectile in &self.projectiles.projectiles()[shots_before..] {
                ctx.events.push(Event::ProjectileFired {
                    lane: self.id,
                    origin: projectile.bounds().center(),
                });
            }
            self.resolve(index, action);
        }
    }

    fn resolve(&mut self, actor: usize, action: Action) {
        match action {
            Action::Idle => {}
            Action::Strike { target, amount } => {
                if let Some(unit) = self.unit_mut(target) {
                    unit.take_damage(amount);
                }
            }
            Action::RangedStrike { reach, amount } => {
                let origin = &self.units[actor];
                let target = self
                    .units
                    .iter()
                    .filter(|other| {
                        origin.facing().opposes(other.facing()) && !other.check_zero_health()
                    })
                    .map(|other| (other.bounds().horizontal_gap(&origin.bounds()), other.id()))
                    .filter(|(gap, _)| *gap <= reach)
                    .min_by(|left, right| left.0.total_cmp(&right.0))
                    .map(|(_, id)| id);
                if let Some(unit) = target.and_then(|id| self.unit_mut(id)) {
                    unit.take_damage(amount);
                }
            }
        }
    }

    fn check_overrun(&mut self, events: &mut Vec<Event>) {
        let tower = self.tower;
        let mut index = 0;
        while index < self.units.len() {
            let unit = &self.units[index];
            if unit.facing() != Facing::TowardTower || !unit.bounds().overlaps(&tower) {
                index += 1;
                continue;
            }
            let unit = self.units.remove(index);
            if !self.overrun {
                self.overrun = true;
                info!(lane = self.id.get(), unit = unit.id().get(), "lane overrun");
                events.push(Event::LaneOverrun { lane: self.id });
            }
            events.push(Event::UnitDestroyed {
                lane: self.id,
                unit: unit.id(),
                kind: unit.kind(),
                cause: DestructionCause::ReachedTower,
                bounds: unit.bounds(),
            });
        }
    }

    fn sweep_dead(&mut self, events: &mut Vec<Event>) {
        let lane = self.id;
        self.units.retain(|unit| {
            if !unit.check_zero_health() {
                return true;
            }
            let cause = if unit.is_self_destructed() {
                DestructionCause::SelfDestructed
            } else {
                DestructionCause::Killed
            };
            debug!(lane = lane.get(), unit = unit.id().get(), ?cause, "unit destroyed");
            events.push(Event::UnitDestroyed {
                lane,
                unit: unit.id(),
                kind: unit.kind(),
                cause,
                bounds: unit.bounds(),
            });
            false
        });
    }

    fn spawn(&mut self, dt: Duration, ctx: &mut TickContext<'_>) {
        let Some(kind) = self.spawner.advance(dt, &mut *ctx.rng) else {
            return;
        };
        let entry = self
            .last_tile_center()
            .unwrap_or_else(|| self.bounds.center());
        let mut alien = factory::alien(ctx.ids.allocate(), kind, Facing::TowardTower);
        alien.set_center(entry);
        debug!(lane = self.id.get(), unit = alien.id().get(), kind = kind.name(), "alien spawned");
        ctx.events.push(Event::AlienSpawned {
            lane: self.id,
            unit: alien.id(),
            kind,
        });
        self.units.push(alien);
    }

    fn advance_projectiles(&mut self, dt: Duration, ctx: &mut TickContext<'_>) {
        self.projectiles.advance(dt, self.bounds);
        let lane = self.id;
        let rewards = &self.rewards;
        let units = &mut self.units;
        self.projectiles.retain(|projectile| {
            let Some(target) = units.iter_mut().find(|unit| {
                unit.facing() == Facing::TowardTower
                    && !unit.check_zero_health()
                    && unit.bounds().overlaps(&projectile.bounds())
            }) else {
                return true;
            };
            if target.health() - projectile.damage() <= 0.0 {
                ctx.player.add_money(rewards.money_per_kill);
                ctx.player.add_score(rewards.score_per_kill);
                ctx.events.push(Event::KillRewarded {
                    lane,
                    unit: target.id(),
                    money: rewards.money_per_kill,
                    score: rewards.score_per_kill,
                });
            }
            target.take_damage(projectile.damage());
            false
        });
    }

    fn check_cleared(&mut self, events: &mut Vec<Event>) {
        if self.cleared || self.spawner.remaining() > 0 || !self.is_lane_cleared() {
            return;
        }
        self.cleared = true;
        info!(lane = self.id.get(), "lane cleared");
        events.push(Event::LaneCleared { lane: self.id });
    }

    pub(crate) fn snapshot_units(&self) -> impl Iterator<Item = UnitSnapshot> + '_ {
        self.units.iter().map(|unit| unit.snapshot(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SpawningConfig, player::Player};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use station_defender_core::{AlienKind, UnitKind, WeaponKind};

    const FRAME: Duration = Duration::from_millis(16);
    const TOWER: Bounds = Bounds::new(0.0, 0.0, 100.0, 1_000.0);

    struct Harness {
        rng: ChaCha8Rng,
        player: Player,
        ids: UnitIds,
        events: Vec<Event>,
    }

    impl Harness {
        fn new() -> Self {
            let mut ids = UnitIds::default();
            // Reserve low identifiers for units placed by hand.
            for _ in 0..100 {
                let _ = ids.allocate();
            }
            Self {
                rng: ChaCha8Rng::seed_from_u64(21),
                player: Player::default(),
                ids,
                events: Vec::new(),
            }
        }

        fn tick(&mut self, lane: &mut Lane, dt: Duration) {
            let mut ctx = TickContext::new(
                &mut self.rng,
                &mut self.player,
                &mut self.ids,
                &mut self.events,
            );
            lane.tick(dt, &mut ctx);
        }
    }

    fn config(min_budget: u32, max_budget: u32) -> GameConfig {
        GameConfig {
            spawning: SpawningConfig {
                min_budget,
                max_budget,
                ..SpawningConfig::default()
            },
            ..GameConfig::default()
        }
    }

    fn lane(config: &GameConfig, harness: &mut Harness) -> Lane {
        Lane::new(
            LaneId::new(0),
            Point::new(100.0, 120.0),
            TOWER,
            config,
            &mut harness.rng,
        )
    }

    #[test]
    fn tiles_are_laid_out_left_to_right() {
        let mut harness = Harness::new();
        let lane = lane(&config(2, 12), &mut harness);

        assert_eq!(lane.tiles().len(), 9);
        assert_eq!(lane.bounds(), Bounds::new(100.0, 120.0, 900.0, 100.0));
        assert_eq!(lane.last_tile_center(), Some(Point::new(950.0, 170.0)));
        assert_eq!(
            lane.tile(1).map(Tile::bounds),
            Ok(Bounds::new(100.0, 120.0, 100.0, 100.0))
        );
    }

    #[test]
    fn tile_lookups_are_one_based() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);

        assert_eq!(
            lane.tile(0).err(),
            Some(LookupError::IndexOutOfBounds { index: 0, len: 9 })
        );
        assert!(lane.tile(9).is_ok());
        assert!(lane.tile(10).is_err());

        let removed = lane.remove_tile_by_index(9).expect("last tile");
        assert_eq!(lane.bounds().width, 800.0);
        lane.add_tile(removed);
        assert_eq!(lane.bounds().width, 900.0);
    }

    #[test]
    fn placement_centres_units_and_rejects_occupied_tiles() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);

        let first = factory::weapon(UnitId::new(1), WeaponKind::Standard);
        assert_eq!(lane.place(first, Point::new(210.0, 150.0)), Ok(UnitId::new(1)));
        assert_eq!(
            lane.unit(UnitId::new(1)).map(Unit::bounds),
            Some(Bounds::new(220.0, 140.0, 60.0, 60.0))
        );
        assert_eq!(lane.is_tile_occupied(2), Ok(true));
        assert_eq!(lane.is_tile_occupied(3), Ok(false));

        let second = factory::weapon(UnitId::new(2), WeaponKind::Standard);
        assert_eq!(
            lane.place(second, Point::new(250.0, 170.0)),
            Err(PlacementError::TileOccupied)
        );

        lane.tile_mut(4).expect("tile").set_invalid(true);
        let third = factory::weapon(UnitId::new(3), WeaponKind::Standard);
        assert_eq!(
            lane.place(third, Point::new(450.0, 170.0)),
            Err(PlacementError::InvalidTile)
        );
    }

    #[test]
    fn tile_markers_survive_ticks() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(1, 2), &mut harness);
        lane.tile_mut(4).expect("tile").set_invalid(true);
        lane.tile_mut(2).expect("tile").set_has_item(true);

        for _ in 0..50 {
            harness.tick(&mut lane, FRAME);
        }

        let flags: Vec<(bool, bool)> = lane
            .tiles()
            .iter()
            .map(|tile| (tile.is_invalid(), tile.has_item()))
            .collect();
        assert_eq!(flags[3], (true, false));
        assert_eq!(flags[1], (false, true));
        assert_eq!(
            flags.iter().filter(|flag| **flag != (false, false)).count(),
            2
        );
        assert_eq!(
            lane.place(
                factory::weapon(UnitId::new(1), WeaponKind::Standard),
                Point::new(450.0, 170.0),
            ),
            Err(PlacementError::InvalidTile)
        );
    }

    #[test]
    fn single_alien_overruns_an_undefended_lane() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(1, 2), &mut harness);
        assert_eq!(lane.remaining_aliens(), 1);

        let mut spawned = None;
        for _ in 0..2_000 {
            harness.tick(&mut lane, FRAME);
            if spawned.is_none() {
                spawned = lane.units().first().map(Unit::id);
            }
            if lane.is_overrun() {
                break;
            }
        }

        let alien = spawned.expect("alien spawned");
        assert!(lane.is_overrun());
        assert!(lane.unit(alien).is_none());
        assert!(harness.events.contains(&Event::LaneOverrun {
            lane: LaneId::new(0)
        }));
        assert!(harness.events.iter().any(|event| matches!(
            event,
            Event::UnitDestroyed {
                unit,
                cause: DestructionCause::ReachedTower,
                ..
            } if *unit == alien
        )));

        let overruns = harness
            .events
            .iter()
            .filter(|event| matches!(event, Event::LaneOverrun { .. }))
            .count();
        assert_eq!(overruns, 1);
    }

    #[test]
    fn cleared_requires_spent_budget_and_no_enemies() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(1, 2), &mut harness);

        harness.tick(&mut lane, FRAME);
        assert!(lane.is_lane_cleared());
        assert!(!lane.is_cleared(), "budget still holds an alien");

        harness.tick(&mut lane, Duration::from_secs(5));
        assert_eq!(lane.remaining_aliens(), 0);
        assert!(!lane.is_lane_cleared());
        assert!(!lane.is_cleared(), "the spawned alien still faces the tower");

        let alien = lane.units()[0].id();
        lane.unit_mut(alien).expect("alien").destroy();
        harness.tick(&mut lane, FRAME);
        assert!(lane.is_cleared());
        assert!(harness.events.contains(&Event::LaneCleared {
            lane: LaneId::new(0)
        }));
    }

    #[test]
    fn adjacency_pairs_overlapping_opponents_both_ways() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let weapon = factory::weapon(UnitId::new(1), WeaponKind::Standard);
        let _ = lane.place(weapon, Point::new(150.0, 170.0));
        let mut alien = factory::alien(UnitId::new(2), AlienKind::Generic, Facing::TowardTower);
        alien.set_center(Point::new(220.0, 170.0));
        lane.units.push(alien);

        lane.recompute_adjacency();

        assert_eq!(lane.units[0].adjacent_actor(), Some(UnitId::new(2)));
        assert_eq!(lane.units[1].adjacent_actor(), Some(UnitId::new(1)));

        lane.units[1].set_center(Point::new(600.0, 170.0));
        lane.recompute_adjacency();
        assert!(!lane.units[0].is_adjacent());
        assert!(!lane.units[1].is_adjacent());
    }

    #[test]
    fn opponents_are_preferred_over_allies() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let _ = lane.place(
            factory::weapon(UnitId::new(1), WeaponKind::Standard),
            Point::new(150.0, 170.0),
        );
        let mut ally = factory::alien(UnitId::new(2), AlienKind::Generic, Facing::TowardTower);
        ally.set_center(Point::new(260.0, 170.0));
        let mut front = factory::alien(UnitId::new(3), AlienKind::Generic, Facing::TowardTower);
        front.set_center(Point::new(220.0, 170.0));
        lane.units.push(ally);
        lane.units.push(front);

        lane.recompute_adjacency();

        assert_eq!(lane.units[2].adjacent_actor(), Some(UnitId::new(1)));
        assert_eq!(lane.units[1].adjacent_actor(), Some(UnitId::new(3)));
    }

    #[test]
    fn lethal_projectile_rewards_once_and_is_consumed() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let mut alien = factory::alien(UnitId::new(2), AlienKind::Generic, Facing::TowardTower);
        alien.set_center(Point::new(600.0, 170.0));
        alien.take_damage(60.0);
        lane.units.push(alien);
        lane.projectiles.shoot(Point::new(555.0, 170.0), 0.0);
        lane.projectiles.shoot(Point::new(556.0, 170.0), 0.0);

        let mut ctx = TickContext::new(
            &mut harness.rng,
            &mut harness.player,
            &mut harness.ids,
            &mut harness.events,
        );
        lane.advance_projectiles(FRAME, &mut ctx);

        assert_eq!(harness.player.money(), 1);
        assert_eq!(harness.player.score(), 10);
        assert_eq!(lane.units[0].health(), 0.0);
        assert_eq!(lane.projectiles().len(), 1, "second shot skips the corpse");
        let rewards = harness
            .events
            .iter()
            .filter(|event| matches!(event, Event::KillRewarded { .. }))
            .count();
        assert_eq!(rewards, 1);
    }

    #[test]
    fn non_lethal_projectile_does_not_reward() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let mut alien = factory::alien(UnitId::new(2), AlienKind::Generic, Facing::TowardTower);
        alien.set_center(Point::new(600.0, 170.0));
        lane.units.push(alien);
        lane.projectiles.shoot(Point::new(560.0, 170.0), 0.0);

        harness.tick(&mut lane, FRAME);

        assert_eq!(harness.player.money(), 0);
        assert_eq!(lane.unit(UnitId::new(2)).map(Unit::health), Some(50.0));
        assert!(lane.projectiles().is_empty());
    }

    #[test]
    fn projectiles_pass_through_defenders() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let _ = lane.place(
            factory::defender(UnitId::new(1), UnitKind::Alien(AlienKind::Mine)),
            Point::new(550.0, 170.0),
        );
        lane.projectiles.shoot(Point::new(550.0, 170.0), 0.0);

        harness.tick(&mut lane, FRAME);

        assert_eq!(lane.projectiles().len(), 1);
        assert_eq!(harness.player.score(), 0);
    }

    #[test]
    fn kamikaze_self_destruction_is_reported() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let _ = lane.place(
            factory::weapon(UnitId::new(1), WeaponKind::Standard),
            Point::new(150.0, 170.0),
        );
        let mut kamikaze = factory::alien(UnitId::new(2), AlienKind::Kamikaze, Facing::TowardTower);
        kamikaze.set_center(Point::new(220.0, 170.0));
        lane.units.push(kamikaze);

        harness.tick(&mut lane, FRAME);

        assert!(lane.unit(UnitId::new(2)).is_none());
        assert!(harness.events.iter().any(|event| matches!(
            event,
            Event::UnitDestroyed {
                cause: DestructionCause::SelfDestructed,
                ..
            }
        )));
    }

    #[test]
    fn mines_strike_the_nearest_alien_in_reach() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let _ = lane.place(
            factory::defender(UnitId::new(1), UnitKind::Alien(AlienKind::Mine)),
            Point::new(150.0, 170.0),
        );
        let mut near = factory::alien(UnitId::new(2), AlienKind::Generic, Facing::TowardTower);
        near.set_center(Point::new(300.0, 170.0));
        let mut far = factory::alien(UnitId::new(3), AlienKind::Generic, Facing::TowardTower);
        far.set_center(Point::new(800.0, 170.0));
        lane.units.push(far);
        lane.units.push(near);

        harness.tick(&mut lane, FRAME);

        assert_eq!(lane.unit(UnitId::new(2)).map(Unit::health), Some(70.0));
        assert_eq!(lane.unit(UnitId::new(3)).map(Unit::health), Some(100.0));
    }

    #[test]
    fn built_weapons_announce_completion_and_fire() {
        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let _ = lane.place(
            factory::weapon(UnitId::new(1), WeaponKind::Standard),
            Point::new(150.0, 170.0),
        );

        for _ in 0..4 {
            harness.tick(&mut lane, Duration::from_millis(500));
        }

        assert!(harness.events.contains(&Event::WeaponBuilt {
            unit: UnitId::new(1)
        }));
        let origin = harness.events.iter().find_map(|event| match event {
            Event::ProjectileFired { origin, .. } => Some(*origin),
            _ => None,
        });
        assert_eq!(origin, Some(Point::new(160.0, 175.0)));
    }

    #[test]
    fn rewards_go_to_the_sink() {
        struct Ledger(u32, u32);
        impl PlayerSink for Ledger {
            fn add_money(&mut self, amount: u32) {
                self.0 += amount;
            }
            fn add_score(&mut self, amount: u32) {
                self.1 += amount;
            }
        }

        let mut harness = Harness::new();
        let mut lane = lane(&config(2, 12), &mut harness);
        let mut alien = factory::alien(UnitId::new(2), AlienKind::Generic, Facing::TowardTower);
        alien.set_center(Point::new(600.0, 170.0));
        alien.take_damage(50.0);
        lane.units.push(alien);
        lane.projectiles.shoot(Point::new(560.0, 170.0), 0.0);

        let mut ledger = Ledger(0, 0);
        let mut ctx = TickContext::new(
            &mut harness.rng,
            &mut ledger,
            &mut harness.ids,
            &mut harness.events,
        );
        lane.tick(FRAME, &mut ctx);

        assert_eq!((ledger.0, ledger.1), (1, 10));
    }
}
