//! Randomised alien spawn cadence and budget.

use std::time::Duration;

use rand::{Rng, RngCore};
use station_defender_core::AlienKind;

use crate::{
    config::{Roster, SpawningConfig},
    factory,
};

/// Randomised cadence and budget of a lane's alien spawns.
#[derive(Clone, Debug)]
pub struct SpawnSchedule {
    accumulator: Duration,
    interval: Duration,
    remaining: u32,
    roster: Roster,
    min_interval_ms: u64,
    max_interval_ms: u64,
}

impl SpawnSchedule {
    /// Draws a fresh budget and first interval from `config`.
    ///
    /// The ranges in `config` must be non-empty, which [`crate::GameConfig::validate`] checks.
    pub fn new(config: &SpawningConfig, rng: &mut dyn RngCore) -> Self {
        let mut schedule = Self {
            accumulator: Duration::ZERO,
            interval: Duration::ZERO,
            remaining: rng.gen_range(config.min_budget..config.max_budget),
            roster: config.roster,
            min_interval_ms: config.min_interval_ms,
            max_interval_ms: config.max_interval_ms,
        };
        schedule.draw_interval(rng);
        schedule
    }

    fn draw_interval(&mut self, rng: &mut dyn RngCore) {
        self.interval =
            Duration::from_millis(rng.gen_range(self.min_interval_ms..self.max_interval_ms));
    }

    /// Aliens still to be spawned.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Interval currently being waited out.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulates `dt` and returns the variant to spawn once the interval is exceeded.
    ///
    /// The accumulator resets and a new interval is drawn whenever the interval is exceeded,
    /// even when the budget is spent.
    pub fn advance(&mut self, dt: Duration, rng: &mut dyn RngCore) -> Option<AlienKind> {
        self.accumulator = self.accumulator.saturating_add(dt);
        if self.accumulator <= self.interval {
            return None;
        }
        self.accumulator = Duration::ZERO;
        self.draw_interval(rng);
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(match self.roster {
            Roster::Generic => AlienKind::Generic,
            Roster::Mixed if self.remaining == 0 => AlienKind::Boss,
            Roster::Mixed => factory::random_enemy(rng),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(roster: Roster) -> SpawningConfig {
        SpawningConfig {
            min_interval_ms: 2_000,
            max_interval_ms: 5_000,
            min_budget: 3,
            max_budget: 4,
            roster,
        }
    }

    #[test]
    fn draws_stay_within_configured_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let schedule = SpawnSchedule::new(&SpawningConfig::default(), &mut rng);
            assert!((2..12).contains(&schedule.remaining()));
            let interval = schedule.interval();
            assert!(interval >= Duration::from_millis(2_000));
            assert!(interval < Duration::from_millis(5_000));
        }
    }

    #[test]
    fn spawns_only_after_the_interval_is_exceeded() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut schedule = SpawnSchedule::new(&config(Roster::Generic), &mut rng);
        let interval = schedule.interval();

        assert_eq!(schedule.advance(interval, &mut rng), None);
        assert_eq!(
            schedule.advance(Duration::from_millis(1), &mut rng),
            Some(AlienKind::Generic)
        );
        assert_eq!(schedule.remaining(), 2);
    }

    #[test]
    fn spent_budget_stops_spawning() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut schedule = SpawnSchedule::new(&config(Roster::Generic), &mut rng);
        let long = Duration::from_secs(6);

        let spawned = (0..10)
            .filter_map(|_| schedule.advance(long, &mut rng))
            .count();

        assert_eq!(spawned, 3);
        assert_eq!(schedule.remaining(), 0);
    }

    #[test]
    fn mixed_roster_ends_with_a_boss() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut schedule = SpawnSchedule::new(&config(Roster::Mixed), &mut rng);
        let long = Duration::from_secs(6);

        let spawned: Vec<AlienKind> = (0..3)
            .filter_map(|_| schedule.advance(long, &mut rng))
            .collect();

        assert_eq!(spawned.len(), 3);
        assert_eq!(spawned[2], AlienKind::Boss);
        assert!(spawned[..2]
            .iter()
            .all(|kind| AlienKind::ROSTER.contains(kind)));
    }
}
