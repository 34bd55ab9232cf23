use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::Difficulty;

/// Everything the quiz session tells the outside world about a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum QuizEvent {
    QuestionShown {
        question_id: u32,
        level: u32,
    },
    NoQuestionsAvailable {
        difficulty: Difficulty,
        level: u32,
    },
    Answered {
        correct: bool,
        choice: usize,
        explanation: String,
    },
    RewardGranted {
        amount: u32,
        wrong_streak: u32,
    },
    CoinsChanged {
        total: u32,
    },
    RewardPopupDismissed {},
    LevelAdvanced {
        level: u32,
    },
    RunCompleted {
        run_id: Uuid,
        correct: u32,
        coins: u32,
    },
}
