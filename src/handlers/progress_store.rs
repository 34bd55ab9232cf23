use std::rc::Rc;

use log::{info, warn};

use crate::{
    error::LadderResult,
    handlers::store::KeyValueStore,
    models::{progress::ProgressRecord, question::Difficulty},
};

/// Per-difficulty level, correct-answer and coin counters.
///
/// Each difficulty gets its own key namespace so the modes progress independently.
pub struct ProgressStore {
    store: Rc<dyn KeyValueStore>,
}

fn key(difficulty: Difficulty, field: &str) -> String {
    format!("SL_{}_{}", difficulty, field)
}

impl ProgressStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> ProgressStore {
        ProgressStore { store }
    }

    pub fn save_level(&self, difficulty: Difficulty, level: u32) -> LadderResult<()> {
        self.store
            .set_int(&key(difficulty, "LEVEL"), i64::from(level.max(1)))
    }

    pub fn load_level(&self, difficulty: Difficulty, default_level: u32) -> LadderResult<u32> {
        self.load(difficulty, "LEVEL", default_level.max(1), 1)
    }

    pub fn save_correct_count(&self, difficulty: Difficulty, correct: u32) -> LadderResult<()> {
        self.store
            .set_int(&key(difficulty, "CORRECT"), i64::from(correct))
    }

    pub fn load_correct_count(&self, difficulty: Difficulty) -> LadderResult<u32> {
        self.load(difficulty, "CORRECT", 0, 0)
    }

    pub fn save_coins(&self, difficulty: Difficulty, coins: u32) -> LadderResult<()> {
        self.store.set_int(&key(difficulty, "COINS"), i64::from(coins))
    }

    pub fn load_coins(&self, difficulty: Difficulty) -> LadderResult<u32> {
        self.load(difficulty, "COINS", 0, 0)
    }

    pub fn clear_difficulty(&self, difficulty: Difficulty) -> LadderResult<()> {
        for field in ["LEVEL", "CORRECT", "COINS"] {
            self.store.delete(&key(difficulty, field))?;
        }
        info!("Cleared progress for {}", difficulty);
        Ok(())
    }

    pub fn clear_all(&self) -> LadderResult<()> {
        for difficulty in Difficulty::ALL {
            self.clear_difficulty(difficulty)?;
        }
        Ok(())
    }

    pub fn get(&self, difficulty: Difficulty) -> LadderResult<ProgressRecord> {
        Ok(ProgressRecord {
            level: self.load_level(difficulty, 1)?,
            correct: self.load_correct_count(difficulty)?,
            coins: self.load_coins(difficulty)?,
        })
    }

    pub fn put(&self, difficulty: Difficulty, record: &ProgressRecord) -> LadderResult<()> {
        self.save_level(difficulty, record.level)?;
        self.save_correct_count(difficulty, record.correct)?;
        self.save_coins(difficulty, record.coins)
    }

    fn load(&self, difficulty: Difficulty, field: &str, default: u32, min: u32) -> LadderResult<u32> {
        let stored = self.store.get_int(&key(difficulty, field))?;
        Ok(match stored {
            Some(value) => match u32::try_from(value) {
                Ok(value) => value.max(min),
                Err(_) => {
                    warn!("Stored {} for {} out of range: {}", field, difficulty, value);
                    if value < 0 {
                        min
                    } else {
                        u32::MAX
                    }
                }
            },
            None => default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::store::MemoryStore;

    fn progress_store() -> (Rc<MemoryStore>, ProgressStore) {
        let backing = Rc::new(MemoryStore::new());
        let store = ProgressStore::new(backing.clone());
        (backing, store)
    }

    #[test]
    fn cleared_level_defaults_to_one() {
        let (_, store) = progress_store();
        for difficulty in Difficulty::ALL {
            store.save_level(difficulty, 7).unwrap();
            store.clear_difficulty(difficulty).unwrap();
            assert_eq!(store.load_level(difficulty, 1).unwrap(), 1);
        }
    }

    #[test]
    fn saved_level_reads_back_immediately() {
        let (_, store) = progress_store();
        for level in [1, 2, 9, 3, 250] {
            store.save_level(Difficulty::Hard, level).unwrap();
            assert_eq!(store.load_level(Difficulty::Hard, 1).unwrap(), level);
        }
    }

    #[test]
    fn level_is_clamped_to_one() {
        let (_, store) = progress_store();
        store.save_level(Difficulty::Easy, 0).unwrap();
        assert_eq!(store.load_level(Difficulty::Easy, 1).unwrap(), 1);
        assert_eq!(store.load_level(Difficulty::Normal, 0).unwrap(), 1);
    }

    #[test]
    fn negative_stored_values_are_clamped() {
        let (backing, store) = progress_store();
        backing.set_int("SL_Expert_COINS", -40).unwrap();
        backing.set_int("SL_Expert_LEVEL", -2).unwrap();
        assert_eq!(store.load_coins(Difficulty::Expert).unwrap(), 0);
        assert_eq!(store.load_level(Difficulty::Expert, 1).unwrap(), 1);
    }

    #[test]
    fn clear_difficulty_leaves_other_modes_alone() {
        let (_, store) = progress_store();
        store.save_coins(Difficulty::Easy, 30).unwrap();
        store.save_coins(Difficulty::Normal, 12).unwrap();
        store.clear_difficulty(Difficulty::Easy).unwrap();
        assert_eq!(store.load_coins(Difficulty::Easy).unwrap(), 0);
        assert_eq!(store.load_coins(Difficulty::Normal).unwrap(), 12);
    }

    #[test]
    fn clear_all_empties_the_namespace() {
        let (backing, store) = progress_store();
        for difficulty in Difficulty::ALL {
            let record = ProgressRecord {
                level: 3,
                correct: 5,
                coins: 40,
            };
            store.put(difficulty, &record).unwrap();
        }
        store.clear_all().unwrap();
        assert!(backing.is_empty());
        assert_eq!(
            store.get(Difficulty::Advanced).unwrap(),
            ProgressRecord::default()
        );
    }

    #[test]
    fn record_round_trips_through_repository_view() {
        let (_, store) = progress_store();
        let record = ProgressRecord {
            level: 6,
            correct: 11,
            coins: 73,
        };
        store.put(Difficulty::Normal, &record).unwrap();
        assert_eq!(store.get(Difficulty::Normal).unwrap(), record);
    }
}
