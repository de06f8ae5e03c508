#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure session system that tallies a match and reports its outcome exactly once.

use std::time::Duration;

use station_defender_core::{DestructionCause, Event, Outcome, UnitKind};

/// Running totals for a single match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Simulated time observed through [`Event::TimeAdvanced`].
    pub elapsed: Duration,
    /// Aliens that entered a lane.
    pub aliens_spawned: u32,
    /// Aliens removed after losing their health, including self-destructions.
    pub aliens_destroyed: u32,
    /// Player units placed from the inventory.
    pub units_placed: u32,
    /// Player units destroyed by enemies.
    pub units_lost: u32,
    /// Lanes overrun by an enemy.
    pub lanes_overrun: u32,
    /// Lanes cleared of every threat.
    pub lanes_cleared: u32,
    /// Money credited for kills.
    pub money_earned: u32,
    /// Score credited for kills.
    pub score_earned: u32,
}

/// Session system that watches world events until the match is decided.
#[derive(Debug, Default)]
pub struct Session {
    stats: SessionStats,
    outcome: Option<Outcome>,
}

impl Session {
    /// Creates a new session with zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Outcome reported by the world, if the match is decided.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Consumes world events, returning the outcome on the batch that first decides the match.
    ///
    /// Later batches never report an outcome again, even if the world repeats it.
    pub fn handle(&mut self, events: &[Event]) -> Option<Outcome> {
        let mut decided = None;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.stats.elapsed = self.stats.elapsed.saturating_add(*dt);
                }
                Event::AlienSpawned { .. } => self.stats.aliens_spawned += 1,
                Event::UnitPlaced { .. } => self.stats.units_placed += 1,
                Event::UnitDestroyed { kind, cause, .. } => self.record_destruction(*kind, *cause),
                Event::KillRewarded { money, score, .. } => {
                    self.stats.money_earned = self.stats.money_earned.saturating_add(*money);
                    self.stats.score_earned = self.stats.score_earned.saturating_add(*score);
                }
                Event::LaneOverrun { .. } => self.stats.lanes_overrun += 1,
                Event::LaneCleared { .. } => self.stats.lanes_cleared += 1,
                Event::GameOver { outcome } => {
                    if self.outcome.is_none() {
                        self.outcome = Some(*outcome);
                        decided = Some(*outcome);
                    }
                }
                _ => {}
            }
        }
        decided
    }

    fn record_destruction(&mut self, kind: UnitKind, cause: DestructionCause) {
        if cause == DestructionCause::ReachedTower {
            return;
        }
        match kind {
            UnitKind::Alien(_) if kind.is_mine() => self.stats.units_lost += 1,
            UnitKind::Alien(_) => self.stats.aliens_destroyed += 1,
            UnitKind::Weapon(_) => self.stats.units_lost += 1,
        }
    }
}
