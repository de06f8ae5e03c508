use std::{error::Error, fmt, str::FromStr};

use anyhow::{Context, Result};
use glam::Vec2;
use station_defender_core::ItemKind;
use station_defender_rendering::{FrameInput, PointerInput};
use station_defender_world::{query, World};

/// Items bound to the builder's quick slots, in slot order.
pub(crate) const QUICK_SLOTS: [ItemKind; 4] = [
    ItemKind::Weapon,
    ItemKind::RapidFireTurret,
    ItemKind::CloseCombatWeapon,
    ItemKind::Mine,
];

const ITEM_DELIMITER: char = '@';
const INDEX_DELIMITER: char = ':';

/// Scripted placement written as `item@lane:tile` with 1-based indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlacementOrder {
    item: ItemKind,
    lane: usize,
    tile: usize,
}

impl PlacementOrder {
    /// Frame input that selects the item's quick slot and clicks the target tile.
    pub(crate) fn frame_input(&self, world: &World) -> Result<FrameInput> {
        let slot = QUICK_SLOTS
            .iter()
            .position(|item| *item == self.item)
            .with_context(|| format!("{} has no quick slot", self.item.name()))?;
        let lane = query::board(world)
            .lane(self.lane)
            .with_context(|| format!("placement `{self}` names a missing lane"))?;
        let center = lane
            .tile(self.tile)
            .with_context(|| format!("placement `{self}` names a missing tile"))?
            .center();

        Ok(FrameInput {
            pointer: Some(PointerInput {
                position: Vec2::new(center.x, center.y),
                pressed: true,
            }),
            upgrade_action: false,
            select_slot: Some(slot),
        })
    }
}

impl fmt::Display for PlacementOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{ITEM_DELIMITER}{}{INDEX_DELIMITER}{}",
            item_label(self.item),
            self.lane,
            self.tile
        )
    }
}

impl FromStr for PlacementOrder {
    type Err = PlacementOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (label, indices) = trimmed
            .split_once(ITEM_DELIMITER)
            .ok_or(PlacementOrderError::MissingItem)?;
        let (lane, tile) = indices
            .split_once(INDEX_DELIMITER)
            .ok_or(PlacementOrderError::MissingTile)?;

        let item = QUICK_SLOTS
            .iter()
            .copied()
            .find(|item| item_label(*item) == label)
            .ok_or_else(|| PlacementOrderError::UnknownItem(label.to_owned()))?;

        Ok(Self {
            item,
            lane: parse_index(lane)?,
            tile: parse_index(tile)?,
        })
    }
}

fn item_label(item: ItemKind) -> &'static str {
    match item {
        ItemKind::Weapon => "weapon",
        ItemKind::RapidFireTurret => "rapid_fire_turret",
        ItemKind::CloseCombatWeapon => "close_combat_weapon",
        ItemKind::Mine => "mine",
        ItemKind::Credit => "credit",
    }
}

fn parse_index(value: &str) -> Result<usize, PlacementOrderError> {
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(PlacementOrderError::InvalidIndex(value.to_owned())),
        Ok(index) => Ok(index),
    }
}

/// Spreads every placeable inventory item across the lanes, nearest tiles first.
pub(crate) fn default_orders(world: &World) -> Vec<PlacementOrder> {
    let lanes = query::board(world).lanes();
    let Some(tiles_per_lane) = lanes.iter().map(|lane| lane.tiles().len()).min() else {
        return Vec::new();
    };

    query::player(world)
        .inventory()
        .iter()
        .filter(|stack| QUICK_SLOTS.contains(&stack.item))
        .flat_map(|stack| (0..stack.quantity).map(move |_| stack.item))
        .enumerate()
        .map(|(position, item)| PlacementOrder {
            item,
            lane: position % lanes.len() + 1,
            tile: position / lanes.len() + 1,
        })
        .filter(|order| order.tile <= tiles_per_lane)
        .collect()
}

/// Errors raised while parsing a scripted placement.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PlacementOrderError {
    /// The `@` separating the item from its target was missing.
    MissingItem,
    /// The `:` separating the lane from the tile was missing.
    MissingTile,
    /// The item label does not name a placeable item.
    UnknownItem(String),
    /// A lane or tile index was not a positive integer.
    InvalidIndex(String),
}

impl fmt::Display for PlacementOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingItem => write!(f, "expected `item@lane:tile`"),
            Self::MissingTile => write!(f, "expected `lane:tile` after `@`"),
            Self::UnknownItem(label) => write!(f, "`{label}` is not a placeable item"),
            Self::InvalidIndex(value) => {
                write!(f, "`{value}` is not a 1-based index")
            }
        }
    }
}

impl Error for PlacementOrderError {}
