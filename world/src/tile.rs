//! Fixed placement cells within a lane.

use station_defender_core::{Bounds, Point};

/// Placement slot within a lane.
///
/// Occupancy is derived from the lane's live units and never stored here.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    bounds: Bounds,
    invalid: bool,
    has_item: bool,
}

impl Tile {
    /// Creates a valid, empty tile covering `bounds`.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            invalid: false,
            has_item: false,
        }
    }

    /// Area covered by the tile.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Centre of the tile, where placed units are anchored.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Reports whether the rectangle shares interior area with the tile.
    #[must_use]
    pub fn is_colliding(&self, other: &Bounds) -> bool {
        self.bounds.overlaps(other)
    }

    /// Reports whether a pointer probe at `point` falls inside the tile.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// Reports whether placement on the tile is forbidden.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Marks the tile as forbidden or allowed for placement.
    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    /// Reports whether a pickup rests on the tile.
    #[must_use]
    pub const fn has_item(&self) -> bool {
        self.has_item
    }

    /// Records whether a pickup rests on the tile.
    pub fn set_has_item(&mut self, has_item: bool) {
        self.has_item = has_item;
    }
}
