use serde::{Deserialize, Serialize};

/// Durable per-difficulty counters. `level` is 1-based and never below 1.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRecord {
    pub level: u32,
    pub correct: u32,
    pub coins: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        ProgressRecord {
            level: 1,
            correct: 0,
            coins: 0,
        }
    }
}
