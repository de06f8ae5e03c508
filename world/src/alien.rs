//! Per-variant behaviour of enemy aliens and player-placed mines.

use std::time::Duration;

use rand::RngCore;
use station_defender_core::AlienKind;

use crate::unit::{Action, Body, Burst, CombatStats, FireGate, Partner};

/// Behaviour of the alien family, including the player's mines.
#[derive(Clone, Debug)]
pub(crate) struct Alien {
    kind: AlienKind,
    gate: FireGate,
    burst: Burst,
}

impl Alien {
    pub(crate) fn new(kind: AlienKind, stats: &CombatStats) -> Self {
        Self {
            kind,
            gate: FireGate::new(stats.rate_of_fire),
            burst: Burst::default(),
        }
    }

    pub(crate) fn kind(&self) -> AlienKind {
        self.kind
    }

    /// `hostile` is the adjacent partner when it fights for the other side.
    pub(crate) fn act(
        &mut self,
        body: &mut Body,
        dt: Duration,
        hostile: Option<Partner>,
        rng: &mut dyn RngCore,
    ) -> Action {
        self.gate.advance(dt);
        match self.kind {
            AlienKind::Mine => match hostile {
                Some(_) => Action::Idle,
                None if self.gate.try_fire() => Action::RangedStrike {
                    reach: body.stats.range,
                    amount: body.fire(rng),
                },
                None => Action::Idle,
            },
            AlienKind::Kamikaze => match hostile {
                Some(partner) if !partner.kind.is_mine() => {
                    let amount = body.fire(rng);
                    body.destroy();
                    Action::Strike {
                        target: partner.id,
                        amount,
                    }
                }
                _ => advance(body, dt, hostile),
            },
            AlienKind::RapidFire => {
                if self.burst.cool_down() {
                    return Action::Idle;
                }
                match hostile {
                    Some(partner) if !partner.kind.is_mine() => {
                        self.burst.volley(body, partner.id, rng)
                    }
                    _ => advance(body, dt, hostile),
                }
            }
            AlienKind::Generic | AlienKind::CloseCombat | AlienKind::Boss => match hostile {
                Some(partner) => Action::Strike {
                    target: partner.id,
                    amount: body.fire(rng),
                },
                None => advance(body, dt, None),
            },
        }
    }
}

/// Walks toward the tower, trampling any opposing unit in the way for raw damage.
fn advance(body: &mut Body, dt: Duration, hostile: Option<Partner>) -> Action {
    match hostile {
        Some(partner) => Action::Strike {
            target: partner.id,
            amount: body.stats.damage,
        },
        None => {
            body.step(dt);
            Action::Idle
        }
    }
}
