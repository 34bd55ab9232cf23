use std::{collections::BTreeSet, rc::Rc};

use log::{info, warn};

use crate::{
    error::LadderResult,
    handlers::{store::KeyValueStore, wallet::CoinWallet},
    models::shop::ShopItem,
};

pub const OWNED_KEY: &str = "OwnedChars";
pub const EQUIPPED_KEY: &str = "EquippedChar";

/// Owned shop items and the equipped one, saved as a comma-separated id list.
pub struct Inventory {
    store: Rc<dyn KeyValueStore>,
    owned: BTreeSet<String>,
    equipped: Option<String>,
}

impl Inventory {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Inventory {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                warn!("Could not read {}: {}", key, err);
                String::new()
            }
        };

        let owned: BTreeSet<String> = read(OWNED_KEY)
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        let equipped = Some(read(EQUIPPED_KEY)).filter(|id| owned.contains(id));

        Inventory {
            store,
            owned,
            equipped,
        }
    }

    pub fn is_owned(&self, id: &str) -> bool {
        self.owned.contains(id)
    }

    pub fn owned_ids(&self) -> impl Iterator<Item = &str> {
        self.owned.iter().map(String::as_str)
    }

    pub fn equipped(&self) -> Option<&str> {
        self.equipped.as_deref()
    }

    /// Returns whether the id was new. The first owned item is equipped.
    pub fn add_owned(&mut self, id: &str) -> LadderResult<bool> {
        if id.is_empty() || self.owned.contains(id) {
            return Ok(false);
        }
        self.owned.insert(id.to_string());
        if self.equipped.is_none() {
            self.equipped = Some(id.to_string());
        }
        if let Err(err) = self.save() {
            self.owned.remove(id);
            if self.equipped.as_deref() == Some(id) {
                self.equipped = None;
            }
            return Err(err);
        }
        Ok(true)
    }

    pub fn equip(&mut self, id: &str) -> LadderResult<bool> {
        if !self.is_owned(id) {
            return Ok(false);
        }
        if self.equipped.as_deref() == Some(id) {
            return Ok(true);
        }
        self.equipped = Some(id.to_string());
        self.save()?;
        info!("Equipped {}", id);
        Ok(true)
    }

    /// Sells an owned item that is not equipped and refunds its sell price.
    pub fn sell(&mut self, item: &ShopItem, wallet: &mut CoinWallet) -> LadderResult<bool> {
        if !self.is_owned(&item.id) || self.equipped.as_deref() == Some(item.id.as_str()) {
            return Ok(false);
        }

        let refund = item.sell_price();
        wallet.add(refund)?;
        self.owned.remove(&item.id);
        if let Err(err) = self.save() {
            self.owned.insert(item.id.clone());
            if let Err(undo) = wallet.try_spend(refund) {
                warn!("Could not take back refund for {}: {}", item.id, undo);
            }
            return Err(err);
        }
        info!("Sold {} for {}", item.id, refund);
        Ok(true)
    }

    fn save(&self) -> LadderResult<()> {
        let owned: Vec<&str> = self.owned_ids().collect();
        self.store.set(OWNED_KEY, &owned.join(","))?;
        self.store
            .set(EQUIPPED_KEY, self.equipped.as_deref().unwrap_or(""))
    }
}
