//! Combatants shared by both sides of a lane.

use std::time::Duration;

use rand::{Rng, RngCore};
use station_defender_core::{
    Bounds, Facing, LaneId, Point, UnitId, UnitKind, UnitSnapshot,
};

use crate::{alien::Alien, weapon::Weapon};

/// Receives projectile requests issued by units while they act.
pub trait UnitCallback {
    /// Spawns a projectile at `origin` travelling with the signed horizontal `velocity`.
    fn on_fire(&mut self, origin: Point, velocity: f32);
}

/// Combat statistics shared by every unit variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatStats {
    /// Movement speed for aliens, projectile speed for weapons, in world units per second.
    pub speed: f32,
    /// Damage dealt by a successful roll.
    pub damage: f64,
    /// Shots per ten seconds for ranged attacks.
    pub rate_of_fire: f64,
    /// Starting and maximum health.
    pub health: f64,
    /// Reach of ranged strikes in world units.
    pub range: f32,
    /// Percent chance that a roll lands.
    pub chance_to_hit: f64,
    /// Footprint width.
    pub width: f32,
    /// Footprint height.
    pub height: f32,
}

/// Summary of the adjacent unit handed to [`Unit::act`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partner {
    /// Identifier of the partner.
    pub id: UnitId,
    /// Variant of the partner.
    pub kind: UnitKind,
    /// Side the partner fights for.
    pub facing: Facing,
}

impl Partner {
    /// Describes `unit` as an adjacency partner.
    #[must_use]
    pub fn of(unit: &Unit) -> Self {
        Self {
            id: unit.id(),
            kind: unit.kind(),
            facing: unit.facing(),
        }
    }
}

/// Effect a unit requests from its lane after acting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Nothing for the lane to resolve.
    Idle,
    /// Deal `amount` damage to the identified unit.
    Strike {
        /// Unit receiving the damage.
        target: UnitId,
        /// Damage to apply.
        amount: f64,
    },
    /// Deal `amount` damage to the nearest opposing unit within `reach`.
    RangedStrike {
        /// Largest horizontal gap that can be bridged.
        reach: f32,
        /// Damage to apply.
        amount: f64,
    },
}

/// State shared by every variant and borrowed by the variant behaviours.
#[derive(Clone, Debug)]
pub(crate) struct Body {
    pub(crate) id: UnitId,
    pub(crate) bounds: Bounds,
    pub(crate) facing: Facing,
    pub(crate) stats: CombatStats,
    pub(crate) health: f64,
    pub(crate) self_destructed: bool,
}

impl Body {
    /// Rolls against the hit chance and returns the damage dealt.
    pub(crate) fn fire(&self, rng: &mut dyn RngCore) -> f64 {
        let chance = if self.stats.chance_to_hit.is_finite() {
            (self.stats.chance_to_hit / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if rng.gen_bool(chance) {
            self.stats.damage
        } else {
            0.0
        }
    }

    /// Moves along the facing direction for `dt`.
    pub(crate) fn step(&mut self, dt: Duration) {
        self.bounds.x += self.facing.sign() * self.stats.speed * dt.as_secs_f32();
    }

    pub(crate) fn destroy(&mut self) {
        self.health = 0.0;
        self.self_destructed = true;
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Role {
    Alien(Alien),
    Weapon(Weapon),
}

/// A combatant occupying space in a lane.
#[derive(Clone, Debug)]
pub struct Unit {
    body: Body,
    adjacent: Option<UnitId>,
    role: Role,
}

impl Unit {
    pub(crate) fn from_parts(
        id: UnitId,
        facing: Facing,
        stats: CombatStats,
        role: Role,
    ) -> Self {
        Self {
            body: Body {
                id,
                bounds: Bounds::new(0.0, 0.0, stats.width, stats.height),
                facing,
                stats,
                health: stats.health,
                self_destructed: false,
            },
            adjacent: None,
            role,
        }
    }

    /// Identifier allocated to the unit.
    #[must_use]
    pub fn id(&self) -> UnitId {
        self.body.id
    }

    /// Variant of the unit.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        match &self.role {
            Role::Alien(alien) => UnitKind::Alien(alien.kind()),
            Role::Weapon(weapon) => UnitKind::Weapon(weapon.kind()),
        }
    }

    /// Current footprint.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.body.bounds
    }

    /// Side the unit fights for.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.body.facing
    }

    /// Current combat statistics.
    #[must_use]
    pub fn stats(&self) -> &CombatStats {
        &self.body.stats
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> f64 {
        self.body.health
    }

    /// Damage dealt per successful roll.
    #[must_use]
    pub fn damage(&self) -> f64 {
        self.body.stats.damage
    }

    /// Moves the footprint so that its centre sits on `center`.
    pub fn set_center(&mut self, center: Point) {
        self.body.bounds = self.body.bounds.centered_on(center);
    }

    /// Removes `amount` health, never dropping below zero.
    pub fn take_damage(&mut self, amount: f64) {
        if amount > 0.0 {
            self.body.health = (self.body.health - amount).max(0.0);
        }
    }

    /// Restores health up to the unit's maximum.
    pub fn heal(&mut self, amount: f64) {
        if amount > 0.0 && self.body.health > 0.0 {
            self.body.health = (self.body.health + amount).min(self.body.stats.health);
        }
    }

    /// Rolls against the hit chance, returning `damage` on a hit and zero otherwise.
    pub fn fire(&self, rng: &mut dyn RngCore) -> f64 {
        self.body.fire(rng)
    }

    /// Reports whether the unit has no health left.
    #[must_use]
    pub fn check_zero_health(&self) -> bool {
        self.body.health <= 0.0
    }

    /// Sets health to zero so the lane sweeps the unit away.
    pub fn destroy(&mut self) {
        self.body.destroy();
    }

    /// Reports whether the unit removed itself rather than being killed.
    #[must_use]
    pub fn is_self_destructed(&self) -> bool {
        self.body.self_destructed
    }

    /// Reports whether the footprints of the two units overlap.
    #[must_use]
    pub fn is_unit_adjacent(&self, other: &Unit) -> bool {
        self.body.bounds.overlaps(&other.body.bounds)
    }

    /// Records the unit judged adjacent during this tick.
    pub fn set_adjacent_actor(&mut self, partner: Option<UnitId>) {
        self.adjacent = partner;
    }

    /// Unit judged adjacent during this tick.
    #[must_use]
    pub fn adjacent_actor(&self) -> Option<UnitId> {
        self.adjacent
    }

    /// Reports whether any unit was judged adjacent during this tick.
    #[must_use]
    pub fn is_adjacent(&self) -> bool {
        self.adjacent.is_some()
    }

    /// Reports whether the unit has finished construction; aliens always have.
    #[must_use]
    pub fn is_built(&self) -> bool {
        match &self.role {
            Role::Alien(_) => true,
            Role::Weapon(weapon) => weapon.is_built(),
        }
    }

    /// Seconds of construction remaining.
    #[must_use]
    pub fn remaining_build_time(&self) -> f64 {
        match &self.role {
            Role::Alien(_) => 0.0,
            Role::Weapon(weapon) => weapon.remaining_build_time(),
        }
    }

    /// Feeds elapsed time into the construction timer.
    ///
    /// Returns `true` when the call removed a half-second step. Aliens ignore the call.
    pub fn decrement_build_timer(&mut self, elapsed: Duration) -> bool {
        match &mut self.role {
            Role::Alien(_) => false,
            Role::Weapon(weapon) => weapon.decrement_build_timer(elapsed),
        }
    }

    /// Price of the next upgrade, for weapons.
    #[must_use]
    pub fn cost_to_upgrade(&self) -> Option<u32> {
        match &self.role {
            Role::Alien(_) => None,
            Role::Weapon(weapon) => Some(weapon.cost_to_upgrade()),
        }
    }

    /// Purchase price of the weapon, for weapons.
    #[must_use]
    pub fn cost(&self) -> Option<u32> {
        match &self.role {
            Role::Alien(_) => None,
            Role::Weapon(weapon) => Some(weapon.cost()),
        }
    }

    /// Raises damage by ten percent and the next upgrade price by a quarter, both rounded up.
    ///
    /// Returns the new damage and upgrade price, or `None` when the unit is not a weapon.
    pub fn upgrade_weapon(&mut self) -> Option<(f64, u32)> {
        match &mut self.role {
            Role::Alien(_) => None,
            Role::Weapon(weapon) => Some(weapon.upgrade(&mut self.body)),
        }
    }

    /// Runs one cycle of the unit's behaviour.
    ///
    /// `partner` describes the unit recorded by [`Unit::set_adjacent_actor`]. Projectiles are
    /// requested through `callback`; damage to other units is returned for the lane to apply.
    pub fn act(
        &mut self,
        dt: Duration,
        partner: Option<Partner>,
        callback: &mut dyn UnitCallback,
        rng: &mut dyn RngCore,
    ) -> Action {
        let hostile = partner.filter(|partner| self.body.facing.opposes(partner.facing));
        match &mut self.role {
            Role::Alien(alien) => alien.act(&mut self.body, dt, hostile, rng),
            Role::Weapon(weapon) => weapon.act(&mut self.body, dt, hostile, callback, rng),
        }
    }

    pub(crate) fn snapshot(&self, lane: LaneId) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id(),
            lane,
            kind: self.kind(),
            bounds: self.bounds(),
            facing: self.facing(),
            health: self.health(),
            damage: self.damage(),
            adjacent: self.adjacent,
            built: self.is_built(),
            remaining_build_time: self.remaining_build_time(),
            cost_to_upgrade: self.cost_to_upgrade(),
        }
    }
}

/// Allocator handing out unit identifiers in increasing order.
#[derive(Clone, Debug, Default)]
pub struct UnitIds {
    next: u32,
}

impl UnitIds {
    /// Returns the next unused identifier.
    pub fn allocate(&mut self) -> UnitId {
        let id = UnitId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Gate that spaces ranged attacks according to a rate of fire.
#[derive(Clone, Debug)]
pub(crate) struct FireGate {
    interval: Duration,
    elapsed: Duration,
}

impl FireGate {
    /// Creates a gate that is ready to fire immediately.
    pub(crate) fn new(rate_of_fire: f64) -> Self {
        let interval = if rate_of_fire > 0.0 {
            Duration::try_from_secs_f64(10.0 / rate_of_fire).unwrap_or(Duration::MAX)
        } else {
            Duration::MAX
        };
        Self {
            interval,
            elapsed: interval,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Consumes the readiness if enough time has passed since the last shot.
    pub(crate) fn try_fire(&mut self) -> bool {
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }
}

const BURST_LENGTH: u32 = 3;

/// Heat tracking for rapid-fire attackers.
#[derive(Clone, Debug, Default)]
pub(crate) struct Burst {
    shots: u32,
    overloaded: bool,
}

impl Burst {
    /// Clears an overload, reporting whether this cycle must be skipped.
    pub(crate) fn cool_down(&mut self) -> bool {
        std::mem::take(&mut self.overloaded)
    }

    /// Fires one shot of the burst at `target`, overloading after the final shot.
    pub(crate) fn volley(&mut self, body: &Body, target: UnitId, rng: &mut dyn RngCore) -> Action {
        let amount = body.fire(rng);
        self.shots += 1;
        if self.shots >= BURST_LENGTH {
            self.shots = 0;
            self.overloaded = true;
        }
        Action::Strike { target, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use station_defender_core::{AlienKind, WeaponKind};

    #[derive(Default)]
    struct Shots(Vec<(Point, f32)>);

    impl UnitCallback for Shots {
        fn on_fire(&mut self, origin: Point, velocity: f32) {
            self.0.push((origin, velocity));
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn damage_never_drops_health_below_zero() {
        let mut alien = factory::alien(UnitId::new(1), AlienKind::Generic, Facing::TowardTower);
        alien.take_damage(40.0);
        assert_eq!(alien.health(), 60.0);
        alien.take_damage(-30.0);
        assert_eq!(alien.health(), 60.0);
        alien.take_damage(1_000.0);
        assert_eq!(alien.health(), 0.0);
        assert!(alien.check_zero_health());
    }

    #[test]
    fn heal_is_capped_at_starting_health() {
        let mut alien = factory::alien(UnitId::new(1), AlienKind::Generic, Facing::TowardTower);
        alien.take_damage(30.0);
        alien.heal(50.0);
        assert_eq!(alien.health(), alien.stats().health);
    }

    #[test]
    fn fire_respects_certain_and_impossible_hits() {
        let mut rng = rng();
        let mut unit = factory::alien(UnitId::new(1), AlienKind::Generic, Facing::TowardTower);

        unit.body.stats.chance_to_hit = 100.0;
        assert_eq!(unit.fire(&mut rng), unit.damage());

        unit.body.stats.chance_to_hit = 0.0;
        for _ in 0..32 {
            assert_eq!(unit.fire(&mut rng), 0.0);
        }
    }

    #[test]
    fn adjacency_follows_footprint_overlap() {
        let mut alien = factory::alien(UnitId::new(1), AlienKind::Generic, Facing::TowardTower);
        let mut weapon = factory::weapon(UnitId::new(2), WeaponKind::Standard);
        weapon.set_center(Point::new(150.0, 170.0));

        alien.set_center(Point::new(300.0, 170.0));
        assert!(!alien.is_unit_adjacent(&weapon));

        alien.set_center(Point::new(220.0, 170.0));
        assert!(alien.is_unit_adjacent(&weapon));
        assert!(weapon.is_unit_adjacent(&alien));
    }

    #[test]
    fn destroy_marks_self_destruction() {
        let mut alien = factory::alien(UnitId::new(1), AlienKind::Kamikaze, Facing::TowardTower);
        alien.destroy();
        assert!(alien.check_zero_health());
        assert!(alien.is_self_destructed());
    }

    #[test]
    fn fire_gate_starts_ready_and_spaces_shots() {
        let mut gate = FireGate::new(10.0);
        assert!(gate.try_fire());
        gate.advance(Duration::from_millis(999));
        assert!(!gate.try_fire());
        gate.advance(Duration::from_millis(1));
        assert!(gate.try_fire());
    }

    #[test]
    fn burst_overloads_after_three_shots() {
        let body = factory::alien(UnitId::new(1), AlienKind::RapidFire, Facing::TowardTower).body;
        let mut burst = Burst::default();
        let mut rng = rng();

        for _ in 0..BURST_LENGTH {
            assert!(!burst.cool_down());
            let _ = burst.volley(&body, UnitId::new(2), &mut rng);
        }
        assert!(burst.cool_down());
        assert!(!burst.cool_down());
    }

    #[test]
    fn aliens_ignore_construction_and_upgrades() {
        let mut alien = factory::alien(UnitId::new(1), AlienKind::Generic, Facing::TowardTower);
        assert!(alien.is_built());
        assert!(!alien.decrement_build_timer(Duration::from_secs(1)));
        assert!(alien.upgrade_weapon().is_none());
        assert!(alien.cost_to_upgrade().is_none());
    }

    #[test]
    fn unbuilt_weapons_do_not_fire() {
        let mut weapon = factory::weapon(UnitId::new(1), WeaponKind::Standard);
        let mut shots = Shots::default();
        let action = weapon.act(Duration::from_millis(16), None, &mut shots, &mut rng());
        assert_eq!(action, Action::Idle);
        assert!(shots.0.is_empty());
    }
}
