//! Consumable inventory, score and currency.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EconomyConfig, ShopItem};
use crate::entity::ConsumableKind;

/// Consumables on hand and the selected slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Flares left
    pub flares: u32,
    /// Grenades left
    pub grenades: u32,
    /// Slot a click uses
    pub selected: ConsumableKind,
}

impl Inventory {
    /// Starting inventory with flares selected.
    #[must_use]
    pub fn starting(config: &EconomyConfig) -> Self {
        Self {
            flares: config.starting_flares,
            grenades: config.starting_grenades,
            selected: ConsumableKind::Flare,
        }
    }

    /// Units of `kind` left.
    #[must_use]
    pub fn count(&self, kind: ConsumableKind) -> u32 {
        match kind {
            ConsumableKind::Flare => self.flares,
            ConsumableKind::Grenade => self.grenades,
        }
    }

    fn slot_mut(&mut self, kind: ConsumableKind) -> &mut u32 {
        match kind {
            ConsumableKind::Flare => &mut self.flares,
            ConsumableKind::Grenade => &mut self.grenades,
        }
    }

    /// Use one unit of `kind`. Returns `false` when none are left.
    pub fn take(&mut self, kind: ConsumableKind) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Add `count` units of `kind`.
    pub fn add(&mut self, kind: ConsumableKind, count: u32) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(count);
    }

    /// Switch the slot a click uses.
    pub fn select(&mut self, kind: ConsumableKind) {
        self.selected = kind;
    }
}

/// Score and spendable currency earned this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    /// Points, before the survivor multiplier
    pub score: u64,
    /// Currency for the shop
    pub money: u64,
}

impl Wallet {
    /// Credit a kill reward to both score and currency.
    pub fn credit(&mut self, reward: u32) {
        self.score = self.score.saturating_add(u64::from(reward));
        self.money = self.money.saturating_add(u64::from(reward));
    }

    /// Spend `price` if affordable.
    pub fn spend(&mut self, price: u64) -> bool {
        if self.money < price {
            return false;
        }
        self.money -= price;
        true
    }
}

/// Shop item for a consumable kind.
#[must_use]
pub fn shop_item(kind: ConsumableKind, config: &EconomyConfig) -> ShopItem {
    match kind {
        ConsumableKind::Flare => config.flare_pack,
        ConsumableKind::Grenade => config.grenade_pack,
    }
}

/// Buy one pack of `kind`. Returns `false` when the wallet cannot cover it.
pub fn buy(
    kind: ConsumableKind,
    wallet: &mut Wallet,
    inventory: &mut Inventory,
    config: &EconomyConfig,
) -> bool {
    let item = shop_item(kind, config);
    if !wallet.spend(item.price) {
        debug!(?kind, price = item.price, money = wallet.money, "purchase declined");
        return false;
    }
    inventory.add(kind, item.count);
    debug!(?kind, count = item.count, "purchase completed");
    true
}
