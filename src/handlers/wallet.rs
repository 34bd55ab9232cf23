use std::rc::Rc;

use log::{info, warn};

use crate::{
    error::{LadderError, LadderResult},
    handlers::store::KeyValueStore,
};

pub const WALLET_KEY: &str = "BM_Coins_v1";

/// The player's spendable coin balance, shared by every game mode.
pub struct CoinWallet {
    store: Rc<dyn KeyValueStore>,
    coins: u32,
}

impl CoinWallet {
    pub fn load(store: Rc<dyn KeyValueStore>) -> LadderResult<CoinWallet> {
        let stored = store.get_int(WALLET_KEY)?.unwrap_or(0);
        let coins = u32::try_from(stored.max(0)).unwrap_or(u32::MAX);
        Ok(CoinWallet { store, coins })
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn add(&mut self, amount: u32) -> LadderResult<()> {
        if amount == 0 {
            return Ok(());
        }
        self.save(self.coins.saturating_add(amount))
    }

    pub fn try_spend(&mut self, amount: u32) -> LadderResult<()> {
        if amount > self.coins {
            warn!("Refused to spend {} coins, balance is {}", amount, self.coins);
            return Err(LadderError::InsufficientCoins {
                needed: amount,
                available: self.coins,
            });
        }
        self.save(self.coins - amount)
    }

    pub fn reset(&mut self) -> LadderResult<()> {
        self.store.delete(WALLET_KEY)?;
        self.coins = 0;
        info!("Wallet reset");
        Ok(())
    }

    /// The balance only changes once the store accepted it.
    fn save(&mut self, coins: u32) -> LadderResult<()> {
        self.store.set_int(WALLET_KEY, i64::from(coins))?;
        self.coins = coins;
        Ok(())
    }
}
