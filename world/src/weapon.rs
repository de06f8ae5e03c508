//! Construction, upgrades and firing of player-built weapons.

use std::time::Duration;

use rand::RngCore;
use station_defender_core::{Point, WeaponKind};

use crate::unit::{Action, Body, Burst, CombatStats, FireGate, Partner, UnitCallback};

/// Wall-clock interval between two construction steps.
const BUILD_STEP_INTERVAL: Duration = Duration::from_millis(500);
/// Seconds of construction removed per step.
const BUILD_STEP: f64 = 0.5;
/// Offset of the muzzle from the weapon's lower-left corner.
const MUZZLE_OFFSET: (f32, f32) = (40.0, 35.0);

/// Purchase data that accompanies a weapon template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Pricing {
    pub(crate) build_time: f64,
    pub(crate) cost: u32,
    pub(crate) cost_to_upgrade: u32,
}

/// Behaviour of the player-built weapon family.
#[derive(Clone, Debug)]
pub(crate) struct Weapon {
    kind: WeaponKind,
    remaining_build_time: f64,
    build_elapsed: Duration,
    built: bool,
    cost: u32,
    cost_to_upgrade: u32,
    gate: FireGate,
    burst: Burst,
}

impl Weapon {
    pub(crate) fn new(kind: WeaponKind, stats: &CombatStats, pricing: Pricing) -> Self {
        Self {
            kind,
            remaining_build_time: pricing.build_time,
            build_elapsed: Duration::ZERO,
            built: pricing.build_time <= 0.0,
            cost: pricing.cost,
            cost_to_upgrade: pricing.cost_to_upgrade,
            gate: FireGate::new(stats.rate_of_fire),
            burst: Burst::default(),
        }
    }

    pub(crate) fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub(crate) fn is_built(&self) -> bool {
        self.built
    }

    pub(crate) fn remaining_build_time(&self) -> f64 {
        self.remaining_build_time
    }

    pub(crate) fn cost(&self) -> u32 {
        self.cost
    }

    pub(crate) fn cost_to_upgrade(&self) -> u32 {
        self.cost_to_upgrade
    }

    /// At most one step is removed per call, however much time elapsed.
    pub(crate) fn decrement_build_timer(&mut self, elapsed: Duration) -> bool {
        self.build_elapsed = self.build_elapsed.saturating_add(elapsed);
        if self.build_elapsed < BUILD_STEP_INTERVAL {
            return false;
        }
        self.build_elapsed = Duration::ZERO;
        if self.remaining_build_time > 0.0 {
            self.remaining_build_time = (self.remaining_build_time - BUILD_STEP).max(0.0);
        }
        if self.remaining_build_time <= 0.0 {
            self.built = true;
        }
        true
    }

    pub(crate) fn upgrade(&mut self, body: &mut Body) -> (f64, u32) {
        body.stats.damage = (body.stats.damage * 1.1).ceil();
        self.cost_to_upgrade = (f64::from(self.cost_to_upgrade) * 1.25).ceil() as u32;
        (body.stats.damage, self.cost_to_upgrade)
    }

    pub(crate) fn act(
        &mut self,
        body: &mut Body,
        dt: Duration,
        hostile: Option<Partner>,
        callback: &mut dyn UnitCallback,
        rng: &mut dyn RngCore,
    ) -> Action {
        if !self.built {
            let _ = self.decrement_build_timer(dt);
            return Action::Idle;
        }
        self.gate.advance(dt);
        match self.kind {
            WeaponKind::Standard => match hostile {
                Some(partner) => Action::Strike {
                    target: partner.id,
                    amount: body.fire(rng),
                },
                None => self.fire_at_range(body, callback),
            },
            WeaponKind::RapidFire => {
                if self.burst.cool_down() {
                    return Action::Idle;
                }
                match hostile {
                    Some(partner) => self.burst.volley(body, partner.id, rng),
                    None => self.fire_at_range(body, callback),
                }
            }
            WeaponKind::CloseCombat => match hostile {
                Some(partner) => Action::Strike {
                    target: partner.id,
                    amount: body.fire(rng),
                },
                None => Action::Idle,
            },
        }
    }

    fn fire_at_range(&mut self, body: &Body, callback: &mut dyn UnitCallback) -> Action {
        if self.gate.try_fire() {
            let muzzle = Point::new(
                body.bounds.x + MUZZLE_OFFSET.0,
                body.bounds.y + MUZZLE_OFFSET.1,
            );
            callback.on_fire(muzzle, body.facing.sign() * body.stats.speed);
        }
        Action::Idle
    }
}
