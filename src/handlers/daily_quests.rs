use std::rc::Rc;

use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    error::LadderResult,
    handlers::{store::KeyValueStore, wallet::CoinWallet},
    models::economy::{DailyQuestEntry, DailyQuestState, QuestDefinition},
};

const DAILY_QUESTS_KEY: &str = "BM_DailyQuestState_v1";

pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

pub struct DailyQuestTracker {
    store: Rc<dyn KeyValueStore>,
    catalog: Vec<QuestDefinition>,
    quests_per_day: usize,
    state: DailyQuestState,
}

impl DailyQuestTracker {
    pub fn load(
        store: Rc<dyn KeyValueStore>,
        catalog: Vec<QuestDefinition>,
        quests_per_day: usize,
    ) -> DailyQuestTracker {
        let state = match store.get(DAILY_QUESTS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
                warn!("Discarding unreadable daily quest save: {}", err);
                DailyQuestState::default()
            }),
            Ok(None) => DailyQuestState::default(),
            Err(err) => {
                warn!("Could not read daily quest save: {}", err);
                DailyQuestState::default()
            }
        };
        DailyQuestTracker {
            store,
            catalog,
            quests_per_day,
            state,
        }
    }

    /// Rolls a fresh list when `today` differs from the saved day. Returns
    /// whether a new list was generated.
    pub fn refresh(&mut self, today: NaiveDate) -> LadderResult<bool> {
        let key = day_key(today);
        if self.state.day == key {
            return Ok(false);
        }

        let mut pool: Vec<&QuestDefinition> = self
            .catalog
            .iter()
            .filter(|quest| quest.eligible_for_daily && !quest.quest_id.trim().is_empty())
            .collect();

        // Same day, same picks, even if the save was lost.
        let seed = u64::from(today.num_days_from_ce().unsigned_abs());
        pool.shuffle(&mut StdRng::seed_from_u64(seed));

        let entries = pool
            .into_iter()
            .take(self.quests_per_day)
            .map(|quest| DailyQuestEntry {
                quest_id: quest.quest_id.clone(),
                progress_tag: quest.progress_tag.clone(),
                current: 0,
                target: quest.target.max(1),
                coin_reward: quest.coin_reward,
                is_complete: false,
                is_claimed: false,
            })
            .collect();

        self.state = DailyQuestState { day: key, entries };
        info!(
            "Generated {} daily quests for {}",
            self.state.entries.len(),
            self.state.day
        );
        self.save()?;
        Ok(true)
    }

    pub fn entries(&self) -> &[DailyQuestEntry] {
        &self.state.entries
    }

    pub fn entry(&self, quest_id: &str) -> Option<&DailyQuestEntry> {
        self.state
            .entries
            .iter()
            .find(|entry| entry.quest_id == quest_id)
    }

    pub fn report(&mut self, tag: &str, amount: u32) -> LadderResult<()> {
        if amount == 0 {
            return Ok(());
        }

        let mut changed = false;
        for entry in self
            .state
            .entries
            .iter_mut()
            .filter(|entry| entry.progress_tag == tag && !entry.is_complete)
        {
            entry.current = entry.current.saturating_add(amount).min(entry.target);
            entry.is_complete = entry.current >= entry.target;
            changed = true;
        }

        if changed {
            self.save()?;
        }
        Ok(())
    }

    pub fn can_claim(&self, quest_id: &str) -> bool {
        self.entry(quest_id)
            .map(|entry| entry.is_complete && !entry.is_claimed)
            .unwrap_or(false)
    }

    /// Credits the wallet, then marks the quest claimed. A failed wallet
    /// write leaves the quest claimable.
    pub fn claim(&mut self, quest_id: &str, wallet: &mut CoinWallet) -> LadderResult<bool> {
        let reward = match self.entry(quest_id) {
            Some(entry) if entry.is_complete && !entry.is_claimed => entry.coin_reward,
            _ => return Ok(false),
        };

        wallet.add(reward)?;
        if let Some(entry) = self
            .state
            .entries
            .iter_mut()
            .find(|entry| entry.quest_id == quest_id)
        {
            entry.is_claimed = true;
        }
        self.save()?;
        info!("Claimed daily quest {}: +{}", quest_id, reward);
        Ok(true)
    }

    fn save(&self) -> LadderResult<()> {
        let json = serde_json::to_string(&self.state)?;
        self.store.set(DAILY_QUESTS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handlers::{
            store::{MemoryStore, ReadOnlyKeys},
            wallet::WALLET_KEY,
        },
        models::economy::default_quests,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup(per_day: usize) -> (Rc<dyn KeyValueStore>, DailyQuestTracker, CoinWallet) {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let tracker = DailyQuestTracker::load(store.clone(), default_quests(), per_day);
        let wallet = CoinWallet::load(store.clone()).unwrap();
        (store, tracker, wallet)
    }

    #[test]
    fn same_day_keeps_the_same_list() {
        let (store, mut tracker, _) = setup(3);
        assert!(tracker.refresh(day(2026, 10, 16)).unwrap());
        let first: Vec<String> = tracker.entries().iter().map(|e| e.quest_id.clone()).collect();
        assert_eq!(first.len(), 3);
        assert!(!tracker.refresh(day(2026, 10, 16)).unwrap());

        let mut fresh = DailyQuestTracker::load(Rc::new(MemoryStore::new()), default_quests(), 3);
        fresh.refresh(day(2026, 10, 16)).unwrap();
        let again: Vec<String> = fresh.entries().iter().map(|e| e.quest_id.clone()).collect();
        assert_eq!(first, again);

        let reloaded = DailyQuestTracker::load(store, default_quests(), 3);
        assert_eq!(reloaded.entries().len(), 3);
    }

    #[test]
    fn new_day_rolls_a_new_list() {
        let (_, mut tracker, _) = setup(2);
        tracker.refresh(day(2026, 10, 16)).unwrap();
        tracker.report("answers_any", 1).unwrap();
        assert!(tracker.refresh(day(2026, 10, 17)).unwrap());
        assert!(tracker.entries().iter().all(|entry| entry.current == 0));
    }

    #[test]
    fn progress_clamps_and_claims_once() {
        let (_, mut tracker, mut wallet) = setup(6);
        tracker.refresh(day(2026, 1, 1)).unwrap();
        tracker.report("answers_correct", 4).unwrap();

        let entry = tracker.entry("correct_3").unwrap();
        assert_eq!(entry.current, 3);
        assert!(entry.is_complete);
        assert!(!tracker.entry("correct_10").unwrap().is_complete);

        assert!(tracker.claim("correct_3", &mut wallet).unwrap());
        assert!(!tracker.claim("correct_3", &mut wallet).unwrap());
        assert!(!tracker.claim("correct_10", &mut wallet).unwrap());
        assert_eq!(wallet.coins(), 25);
    }

    #[test]
    fn ineligible_quests_are_never_picked() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let mut catalog = default_quests();
        for quest in catalog.iter_mut().filter(|quest| quest.quest_id != "login") {
            quest.eligible_for_daily = false;
        }
        let mut tracker = DailyQuestTracker::load(store, catalog, 5);
        tracker.refresh(day(2026, 3, 9)).unwrap();
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.entries()[0].quest_id, "login");
    }

    #[test]
    fn failed_credit_leaves_the_quest_claimable() {
        let store: Rc<dyn KeyValueStore> = Rc::new(ReadOnlyKeys::new(&[WALLET_KEY]));
        let mut tracker = DailyQuestTracker::load(store.clone(), default_quests(), 6);
        let mut wallet = CoinWallet::load(store).unwrap();
        tracker.refresh(day(2026, 1, 1)).unwrap();
        tracker.report("login", 1).unwrap();

        assert!(tracker.claim("login", &mut wallet).is_err());
        assert!(tracker.can_claim("login"));
        assert_eq!(wallet.coins(), 0);
    }
}
