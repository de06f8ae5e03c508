//! Authoritative stack of lanes and the session win/loss latches.

use std::time::Duration;

use rand::RngCore;
use station_defender_core::{
    Bounds, Event, LaneId, LookupError, Outcome, PlacementError, Point, UnitId,
};
use tracing::info;

use crate::{
    config::GameConfig,
    lane::{Lane, TickContext},
    unit::Unit,
};

/// Stack of lanes guarding the tower, with session-long win and loss latches.
#[derive(Clone, Debug)]
pub struct Board {
    lanes: Vec<Lane>,
    tower: Bounds,
    has_won: bool,
    has_lost: bool,
}

impl Board {
    /// Lays out the configured number of lanes bottom to top.
    ///
    /// The tower spans the full board height to the left of the first tile column.
    pub fn new(config: &GameConfig, rng: &mut dyn RngCore) -> Self {
        let layout = &config.board;
        let step = layout.tile_height + layout.lane_gap;
        let height = step * layout.lanes as f32 - layout.lane_gap;
        let tower = Bounds::new(0.0, layout.origin_y, layout.origin_x, height);
        let lanes = (0..layout.lanes)
            .map(|row| {
                let origin = Point::new(layout.origin_x, layout.origin_y + row as f32 * step);
                Lane::new(LaneId::new(row as u32), origin, tower, config, rng)
            })
            .collect();
        Self {
            lanes,
            tower,
            has_won: false,
            has_lost: false,
        }
    }

    /// Area the enemies are trying to reach.
    #[must_use]
    pub const fn tower(&self) -> Bounds {
        self.tower
    }

    /// Lanes in bottom-to-top order.
    #[must_use]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    fn check_index(&self, index: usize) -> Result<usize, LookupError> {
        if index == 0 || index > self.lanes.len() {
            return Err(LookupError::IndexOutOfBounds {
                index,
                len: self.lanes.len(),
            });
        }
        Ok(index - 1)
    }

    /// Looks up a lane by its 1-based position.
    pub fn lane(&self, index: usize) -> Result<&Lane, LookupError> {
        let position = self.check_index(index)?;
        Ok(&self.lanes[position])
    }

    /// Mutable access to a lane by its 1-based position.
    pub fn lane_mut(&mut self, index: usize) -> Result<&mut Lane, LookupError> {
        let position = self.check_index(index)?;
        Ok(&mut self.lanes[position])
    }

    /// Removes and returns the lane at the 1-based position.
    pub fn remove_lane_by_index(&mut self, index: usize) -> Result<Lane, LookupError> {
        let position = self.check_index(index)?;
        Ok(self.lanes.remove(position))
    }

    /// Appends a lane to the top of the board.
    pub fn add_lane(&mut self, lane: Lane) {
        self.lanes.push(lane);
    }

    /// Removes every lane.
    pub fn clear(&mut self) {
        self.lanes.clear();
    }

    /// Reports whether every lane has been cleared.
    #[must_use]
    pub const fn has_won(&self) -> bool {
        self.has_won
    }

    /// Reports whether any lane has been overrun.
    #[must_use]
    pub const fn has_lost(&self) -> bool {
        self.has_lost
    }

    /// Result of the match once decided; a loss outranks a simultaneous win.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        if self.has_lost {
            Some(Outcome::Lost)
        } else if self.has_won {
            Some(Outcome::Won)
        } else {
            None
        }
    }

    /// Places `unit` in the lane containing `at`.
    pub fn place(&mut self, unit: Unit, at: Point) -> Result<(LaneId, UnitId), PlacementError> {
        let lane = self
            .lanes
            .iter_mut()
            .find(|lane| lane.is_colliding(&Bounds::new(at.x, at.y, 1.0, 1.0)))
            .ok_or(PlacementError::NoEligibleLane)?;
        let id = lane.place(unit, at)?;
        Ok((lane.id(), id))
    }

    /// Looks up a live unit in any lane.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<(LaneId, &Unit)> {
        self.lanes
            .iter()
            .find_map(|lane| lane.unit(id).map(|unit| (lane.id(), unit)))
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.lanes.iter_mut().find_map(|lane| lane.unit_mut(id))
    }

    /// Ticks every lane, then updates the latches.
    ///
    /// [`Event::GameOver`] is emitted on the tick the outcome is first decided.
    pub fn tick(&mut self, dt: Duration, ctx: &mut TickContext<'_>) {
        for lane in &mut self.lanes {
            lane.tick(dt, ctx);
        }

        let decided = self.outcome();
        if self.lanes.iter().any(Lane::is_overrun) {
            self.has_lost = true;
        }
        if !self.lanes.is_empty() && self.lanes.iter().all(Lane::is_cleared) {
            self.has_won = true;
        }
        if decided.is_none() {
            if let Some(outcome) = self.outcome() {
                info!(?outcome, "game over");
                ctx.push_event(Event::GameOver { outcome });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SpawningConfig, factory, player::Player, unit::UnitIds};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use station_defender_core::WeaponKind;

    const FRAME: Duration = Duration::from_millis(16);

    struct Harness {
        rng: ChaCha8Rng,
        player: Player,
        ids: UnitIds,
        events: Vec<Event>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rng: ChaCha8Rng::seed_from_u64(5),
                player: Player::default(),
                ids: UnitIds::default(),
                events: Vec::new(),
            }
        }

        fn tick(&mut self, board: &mut Board) {
            let mut ctx = TickContext::new(
                &mut self.rng,
                &mut self.player,
                &mut self.ids,
                &mut self.events,
            );
            board.tick(FRAME, &mut ctx);
        }

        fn game_overs(&self) -> usize {
            self.events
                .iter()
                .filter(|event| matches!(event, Event::GameOver { .. }))
                .count()
        }
    }

    fn config(lanes: usize, min_budget: u32, max_budget: u32) -> GameConfig {
        let mut config = GameConfig {
            spawning: SpawningConfig {
                min_budget,
                max_budget,
                ..SpawningConfig::default()
            },
            ..GameConfig::default()
        };
        config.board.lanes = lanes;
        config
    }

    fn lane_above(board: &Board, config: &GameConfig, harness: &mut Harness) -> Lane {
        let layout = &config.board;
        let row = board.lanes().len();
        let origin = Point::new(
            layout.origin_x,
            layout.origin_y + row as f32 * (layout.tile_height + layout.lane_gap),
        );
        Lane::new(
            LaneId::new(row as u32),
            origin,
            board.tower(),
            config,
            &mut harness.rng,
        )
    }

    #[test]
    fn lane_lookups_are_one_based() {
        let mut harness = Harness::new();
        let mut board = Board::new(&config(3, 2, 12), &mut harness.rng);

        assert_eq!(
            board.lane(0).err(),
            Some(LookupError::IndexOutOfBounds { index: 0, len: 3 })
        );
        assert_eq!(
            board.lane(4).err(),
            Some(LookupError::IndexOutOfBounds { index: 4, len: 3 })
        );
        assert_eq!(board.lane(1).expect("first lane").id(), LaneId::new(0));
        assert_eq!(board.lane(3).expect("last lane").id(), LaneId::new(2));
        assert!(board.lane_mut(4).is_err());

        let removed = board.remove_lane_by_index(2).expect("middle lane");
        assert_eq!(removed.id(), LaneId::new(1));
        assert_eq!(board.lanes().len(), 2);
        assert_eq!(board.lane(2).expect("shifted lane").id(), LaneId::new(2));
        assert!(board.remove_lane_by_index(3).is_err());
    }

    #[test]
    fn placement_outside_every_lane_has_no_eligible_lane() {
        let mut harness = Harness::new();
        let mut board = Board::new(&config(2, 2, 12), &mut harness.rng);

        assert_eq!(
            board.place(
                factory::weapon(UnitId::new(1), WeaponKind::Standard),
                Point::new(150.0, 240.0),
            ),
            Err(PlacementError::NoEligibleLane)
        );
        assert_eq!(
            board.place(
                factory::weapon(UnitId::new(2), WeaponKind::Standard),
                Point::new(150.0, 320.0),
            ),
            Ok((LaneId::new(1), UnitId::new(2)))
        );
        assert_eq!(
            board.unit(UnitId::new(2)).map(|(lane, _)| lane),
            Some(LaneId::new(1))
        );
    }

    #[test]
    fn partial_clear_is_not_a_win() {
        let empty = config(1, 0, 1);
        let threatened = config(1, 1, 2);
        let mut harness = Harness::new();
        let mut board = Board::new(&empty, &mut harness.rng);
        let lane = lane_above(&board, &threatened, &mut harness);
        board.add_lane(lane);

        for _ in 0..10 {
            harness.tick(&mut board);
        }

        assert!(board.lane(1).expect("lane").is_cleared());
        assert!(!board.lane(2).expect("lane").is_cleared());
        assert!(!board.has_won());
        assert!(!board.has_lost());
        assert_eq!(board.outcome(), None);
        assert_eq!(harness.game_overs(), 0);
    }

    #[test]
    fn win_stays_latched_after_new_threats() {
        let empty = config(2, 0, 1);
        let mut harness = Harness::new();
        let mut board = Board::new(&empty, &mut harness.rng);

        harness.tick(&mut board);
        assert!(board.has_won());
        assert_eq!(board.outcome(), Some(Outcome::Won));

        let lane = lane_above(&board, &config(1, 1, 2), &mut harness);
        board.add_lane(lane);
        for _ in 0..10 {
            harness.tick(&mut board);
        }

        assert!(!board.lane(3).expect("lane").is_cleared());
        assert!(board.has_won());
        assert_eq!(harness.game_overs(), 1);
    }

    #[test]
    fn cleared_board_never_wins() {
        let mut harness = Harness::new();
        let mut board = Board::new(&config(2, 0, 1), &mut harness.rng);
        board.clear();

        assert!(board.lanes().is_empty());
        for _ in 0..10 {
            harness.tick(&mut board);
        }

        assert!(!board.has_won());
        assert_eq!(board.outcome(), None);
        assert_eq!(
            board.place(
                factory::weapon(UnitId::new(1), WeaponKind::Standard),
                Point::new(150.0, 170.0),
            ),
            Err(PlacementError::NoEligibleLane)
        );
    }
}
