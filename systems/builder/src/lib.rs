#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating pointer input into placement and upgrade commands.

use station_defender_core::{Command, Event, ItemKind, Point, UnitId};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Indicates whether the player clicked to place the selected item on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player requested an upgrade of the hovered weapon on this frame.
    pub upgrade_action: bool,
    /// World-space pointer position, if the pointer is over the playing field.
    pub cursor: Option<Point>,
    /// Quick slot chosen on this frame, counted from zero.
    pub select_slot: Option<usize>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        confirm_action: bool,
        upgrade_action: bool,
        cursor: Option<Point>,
        select_slot: Option<usize>,
    ) -> Self {
        Self {
            confirm_action,
            upgrade_action,
            cursor,
            select_slot,
        }
    }
}

/// System that turns quick-slot selection and clicks into world commands.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    slots: Vec<ItemKind>,
    selected: Option<usize>,
    game_over: bool,
}

impl Builder {
    /// Creates a builder whose quick slots hold `slots` in order, none selected.
    #[must_use]
    pub fn new(slots: Vec<ItemKind>) -> Self {
        Self {
            slots,
            selected: None,
            game_over: false,
        }
    }

    /// Items bound to the quick slots.
    #[must_use]
    pub fn slots(&self) -> &[ItemKind] {
        &self.slots
    }

    /// Item in the currently selected quick slot.
    #[must_use]
    pub fn selected_item(&self) -> Option<ItemKind> {
        self.selected.and_then(|index| self.slots.get(index).copied())
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// The `weapon_at` closure should resolve the weapon under a world-space point, mirroring
    /// `UnitView::unit_at` restricted to upgradeable units.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut weapon_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(Point) -> Option<UnitId>,
    {
        for event in events {
            if let Event::GameOver { .. } = event {
                self.game_over = true;
            }
        }

        if let Some(slot) = input.select_slot {
            if slot < self.slots.len() {
                self.selected = Some(slot);
            }
        }

        if self.game_over {
            return;
        }

        let Some(cursor) = input.cursor else {
            return;
        };

        if input.confirm_action {
            if let Some(item) = self.selected_item() {
                if item.placeable_unit().is_some() {
                    out.push(Command::PlaceItem { item, at: cursor });
                }
            }
        }

        if input.upgrade_action {
            if let Some(unit) = weapon_at(cursor) {
                out.push(Command::UpgradeWeapon { unit });
            }
        }
    }
}
