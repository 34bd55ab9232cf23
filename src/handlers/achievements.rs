use std::{collections::HashMap, rc::Rc};

use chrono::Utc;
use log::{info, warn};

use crate::{
    error::LadderResult,
    handlers::{store::KeyValueStore, wallet::CoinWallet},
    models::economy::{AchievementDef, AchievementProgress},
};

pub const ACHIEVEMENTS_KEY: &str = "BM_ACHIEVEMENTS_V1";

pub struct AchievementTracker {
    store: Rc<dyn KeyValueStore>,
    defs: Vec<AchievementDef>,
    progress: HashMap<String, AchievementProgress>,
}

impl AchievementTracker {
    pub fn load(store: Rc<dyn KeyValueStore>, defs: Vec<AchievementDef>) -> AchievementTracker {
        let progress = match store.get(ACHIEVEMENTS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                warn!("Discarding unreadable achievement save: {}", err);
                HashMap::new()
            }),
            Ok(None) => HashMap::new(),
            Err(err) => {
                warn!("Could not read achievement save: {}", err);
                HashMap::new()
            }
        };
        AchievementTracker {
            store,
            defs,
            progress,
        }
    }

    pub fn defs(&self) -> &[AchievementDef] {
        &self.defs
    }

    pub fn def(&self, id: &str) -> Option<&AchievementDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    pub fn progress(&self, id: &str) -> AchievementProgress {
        self.progress.get(id).cloned().unwrap_or_default()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.progress(id).completed
    }

    /// Advances every incomplete achievement listening to `tag`. Returns the
    /// ids completed by this report.
    pub fn report(
        &mut self,
        tag: &str,
        amount: u32,
        wallet: &mut CoinWallet,
    ) -> LadderResult<Vec<String>> {
        if amount == 0 {
            return Ok(Vec::new());
        }

        let mut completed = Vec::new();
        let mut changed = false;
        for def in self.defs.iter().filter(|def| def.progress_tag == tag) {
            let progress = self.progress.entry(def.id.clone()).or_default();
            if progress.completed {
                continue;
            }
            changed = true;

            progress.value = progress.value.saturating_add(amount).min(def.target);
            if progress.value < def.target {
                continue;
            }

            progress.completed = true;
            progress.completed_at = Some(Utc::now().to_rfc3339());
            info!("Achievement completed: {} ({})", def.display_name, def.id);

            if def.auto_grant_reward && def.coin_reward > 0 {
                wallet.add(def.coin_reward)?;
                progress.reward_granted = true;
            }
            completed.push(def.id.clone());
        }

        if changed {
            self.save()?;
        }
        Ok(completed)
    }

    pub fn can_claim(&self, id: &str) -> bool {
        match self.def(id) {
            Some(def) => {
                let progress = self.progress(id);
                progress.completed
                    && !progress.reward_granted
                    && def.coin_reward > 0
                    && !def.auto_grant_reward
            }
            None => false,
        }
    }

    pub fn claim(&mut self, id: &str, wallet: &mut CoinWallet) -> LadderResult<bool> {
        if !self.can_claim(id) {
            return Ok(false);
        }
        let reward = match self.def(id) {
            Some(def) => def.coin_reward,
            None => return Ok(false),
        };

        wallet.add(reward)?;
        self.progress.entry(id.to_string()).or_default().reward_granted = true;
        self.save()?;
        info!("Claimed achievement reward for {}: +{}", id, reward);
        Ok(true)
    }

    pub fn reset_all(&mut self) -> LadderResult<()> {
        self.progress.clear();
        self.save()
    }

    fn save(&self) -> LadderResult<()> {
        let json = serde_json::to_string(&self.progress)?;
        self.store.set(ACHIEVEMENTS_KEY, &json)
    }
}
