use std::{path::Path, time::Duration};

use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::{
    error::LadderResult, handlers::quiz_session::SessionOptions, models::question::Difficulty,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub target_correct: u32,
    pub arrive_delay_ms: u64,
    pub reward_popup_ms: u64,
    pub db_path: String,
    pub question_pack: Option<String>,
    pub log_dir: String,
    pub log_level: String,
    pub quests_per_day: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            difficulty: Difficulty::Easy,
            target_correct: 10,
            arrive_delay_ms: 500,
            reward_popup_ms: 1200,
            db_path: "data/progress.db".to_string(),
            question_pack: None,
            log_dir: "log".to_string(),
            log_level: "info".to_string(),
            quests_per_day: 5,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config; a missing file means defaults.
    pub fn load(path: &Path) -> LadderResult<GameConfig> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(GameConfig::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            target_correct: self.target_correct.max(1),
            arrive_delay: Duration::from_millis(self.arrive_delay_ms),
            reward_popup: Duration::from_millis(self.reward_popup_ms),
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ladder.json");
        std::fs::write(&path, r#"{ "difficulty": "Hard", "target_correct": 0 }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.db_path, "data/progress.db");
        assert_eq!(config.session_options().target_correct, 1);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(
            config.session_options().arrive_delay,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn bad_log_level_falls_back_to_info() {
        let config = GameConfig {
            log_level: "chatty".to_string(),
            ..GameConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);
        let config = GameConfig {
            log_level: "debug".to_string(),
            ..GameConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }
}
