//! Templates and constructors for every unit variant.

use rand::{Rng, RngCore};
use station_defender_core::{AlienKind, Facing, UnitId, UnitKind, WeaponKind};

use crate::{
    alien::Alien,
    unit::{CombatStats, Role, Unit},
    weapon::{Pricing, Weapon},
};

const ALIEN_WIDTH: f32 = 100.0;
const ALIEN_HEIGHT: f32 = 38.0;
const WEAPON_SIZE: f32 = 60.0;

/// Default statistics of an alien variant.
#[must_use]
pub fn alien_template(kind: AlienKind) -> CombatStats {
    let generic = CombatStats {
        speed: 120.0,
        damage: 10.0,
        rate_of_fire: 5.0,
        health: 100.0,
        range: 5.0,
        chance_to_hit: 12.0,
        width: ALIEN_WIDTH,
        height: ALIEN_HEIGHT,
    };
    match kind {
        AlienKind::Generic => generic,
        AlienKind::Kamikaze => CombatStats {
            speed: 180.0,
            damage: 40.0,
            health: 60.0,
            chance_to_hit: 75.0,
            ..generic
        },
        AlienKind::RapidFire => CombatStats {
            damage: 5.0,
            rate_of_fire: 20.0,
            health: 80.0,
            chance_to_hit: 30.0,
            ..generic
        },
        AlienKind::CloseCombat => CombatStats {
            speed: 80.0,
            damage: 15.0,
            health: 150.0,
            range: 1.0,
            chance_to_hit: 20.0,
            ..generic
        },
        AlienKind::Boss => CombatStats {
            speed: 60.0,
            damage: 25.0,
            health: 500.0,
            chance_to_hit: 25.0,
            width: 110.0,
            height: 76.0,
            ..generic
        },
        AlienKind::Mine => CombatStats {
            speed: 0.0,
            damage: 30.0,
            rate_of_fire: 2.0,
            health: 50.0,
            range: 150.0,
            chance_to_hit: 100.0,
            width: 40.0,
            height: 20.0,
        },
    }
}

/// Default statistics and pricing of a weapon variant.
#[must_use]
pub(crate) fn weapon_template(kind: WeaponKind) -> (CombatStats, Pricing) {
    let standard = CombatStats {
        speed: 400.0,
        damage: 10.0,
        rate_of_fire: 10.0,
        health: 100.0,
        range: 12.0,
        chance_to_hit: 5.0,
        width: WEAPON_SIZE,
        height: WEAPON_SIZE,
    };
    match kind {
        WeaponKind::Standard => (
            standard,
            Pricing {
                build_time: 1.5,
                cost: 10,
                cost_to_upgrade: 10,
            },
        ),
        WeaponKind::RapidFire => (
            CombatStats {
                speed: 500.0,
                damage: 5.0,
                rate_of_fire: 25.0,
                chance_to_hit: 30.0,
                ..standard
            },
            Pricing {
                build_time: 3.0,
                cost: 15,
                cost_to_upgrade: 15,
            },
        ),
        WeaponKind::CloseCombat => (
            CombatStats {
                speed: 0.0,
                damage: 5.0,
                rate_of_fire: 2.0,
                health: 10.0,
                range: 1.0,
                chance_to_hit: 7.0,
                ..standard
            },
            Pricing {
                build_time: 5.0,
                cost: 50,
                cost_to_upgrade: 25,
            },
        ),
    }
}

/// Creates an alien of the given variant at the origin.
#[must_use]
pub fn alien(id: UnitId, kind: AlienKind, facing: Facing) -> Unit {
    let stats = alien_template(kind);
    Unit::from_parts(id, facing, stats, Role::Alien(Alien::new(kind, &stats)))
}

/// Creates an unbuilt weapon of the given variant at the origin, facing away from the tower.
#[must_use]
pub fn weapon(id: UnitId, kind: WeaponKind) -> Unit {
    let (stats, pricing) = weapon_template(kind);
    Unit::from_parts(
        id,
        Facing::AwayFromTower,
        stats,
        Role::Weapon(Weapon::new(kind, &stats, pricing)),
    )
}

/// Creates a unit for the player's side.
#[must_use]
pub fn defender(id: UnitId, kind: UnitKind) -> Unit {
    match kind {
        UnitKind::Alien(kind) => alien(id, kind, Facing::AwayFromTower),
        UnitKind::Weapon(kind) => weapon(id, kind),
    }
}

/// Draws a uniformly random variant from the mixed roster.
pub fn random_enemy(rng: &mut dyn RngCore) -> AlienKind {
    AlienKind::ROSTER[rng.gen_range(0..AlienKind::ROSTER.len())]
}
