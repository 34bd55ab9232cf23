use log::{info, warn};

use crate::{
    error::LadderResult,
    handlers::{inventory::Inventory, wallet::CoinWallet},
    models::shop::{Purchase, ShopItem},
};

pub struct Shop {
    catalog: Vec<ShopItem>,
}

impl Shop {
    pub fn new(catalog: Vec<ShopItem>) -> Shop {
        Shop { catalog }
    }

    pub fn items(&self) -> &[ShopItem] {
        &self.catalog
    }

    pub fn item(&self, id: &str) -> Option<&ShopItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    /// Buys an item with wallet coins. Running short is an
    /// `InsufficientCoins` error and leaves both wallet and inventory as they were.
    pub fn buy(
        &self,
        item_id: &str,
        wallet: &mut CoinWallet,
        inventory: &mut Inventory,
    ) -> LadderResult<Purchase> {
        let item = match self.item(item_id) {
            Some(item) => item,
            None => return Ok(Purchase::UnknownItem),
        };
        if !item.uses_game_coins {
            return Ok(Purchase::NotForCoins);
        }
        if inventory.is_owned(&item.id) {
            return Ok(Purchase::AlreadyOwned);
        }

        wallet.try_spend(item.coin_cost)?;
        if let Err(err) = inventory.add_owned(&item.id) {
            if let Err(undo) = wallet.add(item.coin_cost) {
                warn!("Could not refund {} after a failed purchase: {}", item.id, undo);
            }
            return Err(err);
        }
        info!("Purchased {} for {} coins", item.display_name, item.coin_cost);
        Ok(Purchase::Bought)
    }

    /// Sells an owned item back for its refund price.
    pub fn sell(
        &self,
        item_id: &str,
        wallet: &mut CoinWallet,
        inventory: &mut Inventory,
    ) -> LadderResult<bool> {
        match self.item(item_id) {
            Some(item) => inventory.sell(item, wallet),
            None => Ok(false),
        }
    }
}
