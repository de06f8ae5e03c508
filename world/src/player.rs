//! Player purse, score and inventory bookkeeping.

use std::collections::BTreeMap;

use station_defender_core::{ItemKind, PlayerSink};

use crate::config::{ItemStack, PlayerConfig};

/// Items held by the player, keyed by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    stacks: BTreeMap<ItemKind, u32>,
}

impl Inventory {
    /// Builds an inventory from configured stacks, merging duplicates.
    #[must_use]
    pub fn from_stacks(stacks: &[ItemStack]) -> Self {
        let mut inventory = Self::default();
        for stack in stacks {
            inventory.add(stack.item, stack.quantity);
        }
        inventory
    }

    /// Adds `quantity` copies of `item`.
    pub fn add(&mut self, item: ItemKind, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let held = self.stacks.entry(item).or_insert(0);
        *held = held.saturating_add(quantity);
    }

    /// Removes one copy of `item`, returning `false` if none was held.
    pub fn take(&mut self, item: ItemKind) -> bool {
        let Some(held) = self.stacks.get_mut(&item) else {
            return false;
        };
        *held -= 1;
        if *held == 0 {
            let _ = self.stacks.remove(&item);
        }
        true
    }

    /// Number of copies of `item` held.
    #[must_use]
    pub fn quantity(&self, item: ItemKind) -> u32 {
        self.stacks.get(&item).copied().unwrap_or(0)
    }

    /// Held stacks in item order.
    pub fn iter(&self) -> impl Iterator<Item = ItemStack> + '_ {
        self.stacks.iter().map(|(&item, &quantity)| ItemStack { item, quantity })
    }
}

/// The player's purse and inventory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Player {
    money: u32,
    score: u32,
    inventory: Inventory,
}

impl Player {
    /// Creates a player with the configured starting money and inventory.
    #[must_use]
    pub fn new(config: &PlayerConfig, inventory: &[ItemStack]) -> Self {
        Self {
            money: config.starting_money,
            score: 0,
            inventory: Inventory::from_stacks(inventory),
        }
    }

    /// Money available for upgrades.
    #[must_use]
    pub const fn money(&self) -> u32 {
        self.money
    }

    /// Score accumulated from kills.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Items held.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Deducts `amount`, returning `false` without change if the purse is short.
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.money.checked_sub(amount) {
            Some(left) => {
                self.money = left;
                true
            }
            None => false,
        }
    }
}

impl PlayerSink for Player {
    fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_merges_and_consumes_stacks() {
        let mut inventory = Inventory::from_stacks(&[
            ItemStack {
                item: ItemKind::Weapon,
                quantity: 1,
            },
            ItemStack {
                item: ItemKind::Weapon,
                quantity: 1,
            },
        ]);

        assert_eq!(inventory.quantity(ItemKind::Weapon), 2);
        assert!(inventory.take(ItemKind::Weapon));
        assert!(inventory.take(ItemKind::Weapon));
        assert!(!inventory.take(ItemKind::Weapon));
        assert_eq!(inventory.iter().count(), 0);
    }

    #[test]
    fn spending_never_overdraws() {
        let mut player = Player::new(&PlayerConfig { starting_money: 5 }, &[]);
        assert!(!player.spend(6));
        assert_eq!(player.money(), 5);
        assert!(player.spend(5));
        assert_eq!(player.money(), 0);

        player.add_money(1);
        player.add_score(10);
        assert_eq!((player.money(), player.score()), (1, 10));
    }
}
