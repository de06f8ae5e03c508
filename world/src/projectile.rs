//! Ballistic projectiles owned by a lane.

use std::time::Duration;

use station_defender_core::{Bounds, Point};

use crate::{config::ProjectileConfig, unit::UnitCallback};

/// Shot travelling horizontally along a lane.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    bounds: Bounds,
    velocity: f32,
    damage: f64,
}

impl Projectile {
    /// Current footprint.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Signed horizontal speed in world units per second.
    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> f64 {
        self.damage
    }
}

/// Lane-owned pool of in-flight projectiles.
#[derive(Clone, Debug)]
pub struct ProjectileFactory {
    projectiles: Vec<Projectile>,
    template: Bounds,
    damage: f64,
}

impl ProjectileFactory {
    /// Creates an empty pool producing projectiles shaped by `config`.
    #[must_use]
    pub fn new(config: &ProjectileConfig) -> Self {
        Self {
            projectiles: Vec::new(),
            template: Bounds::new(0.0, 0.0, config.width, config.height),
            damage: config.damage,
        }
    }

    /// Launches a projectile centred on `origin`.
    pub fn shoot(&mut self, origin: Point, velocity: f32) {
        self.projectiles.push(Projectile {
            bounds: self.template.centered_on(origin),
            velocity,
            damage: self.damage,
        });
    }

    /// Moves every projectile and discards those that left `span` horizontally.
    pub fn advance(&mut self, dt: Duration, span: Bounds) {
        let seconds = dt.as_secs_f32();
        self.projectiles.retain_mut(|projectile| {
            projectile.bounds.x += projectile.velocity * seconds;
            projectile.bounds.right() > span.x && projectile.bounds.x < span.right()
        });
    }

    /// Keeps only the projectiles for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&Projectile) -> bool) {
        self.projectiles.retain(keep);
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

impl UnitCallback for ProjectileFactory {
    fn on_fire(&mut self, origin: Point, velocity: f32) {
        self.shoot(origin, velocity);
    }
}
