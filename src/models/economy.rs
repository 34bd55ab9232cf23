use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AchievementDef {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub progress_tag: String,
    pub target: u32,
    #[serde(default)]
    pub coin_reward: u32,
    #[serde(default)]
    pub auto_grant_reward: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementProgress {
    pub value: u32,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub reward_granted: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestDefinition {
    pub quest_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub progress_tag: String,
    pub target: u32,
    pub coin_reward: u32,
    #[serde(default = "default_eligible")]
    pub eligible_for_daily: bool,
}

fn default_eligible() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DailyQuestEntry {
    pub quest_id: String,
    pub progress_tag: String,
    pub current: u32,
    pub target: u32,
    pub coin_reward: u32,
    pub is_complete: bool,
    pub is_claimed: bool,
}

/// The quests picked for one calendar day (`day` is `YYYYMMDD`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyQuestState {
    pub day: String,
    pub entries: Vec<DailyQuestEntry>,
}

pub fn default_achievements() -> Vec<AchievementDef> {
    vec![
        AchievementDef {
            id: "first_steps".to_string(),
            display_name: "First Steps".to_string(),
            description: "Answer your first question.".to_string(),
            progress_tag: "answers_any".to_string(),
            target: 1,
            coin_reward: 5,
            auto_grant_reward: true,
        },
        AchievementDef {
            id: "quick_thinker".to_string(),
            display_name: "Quick Thinker".to_string(),
            description: "Answer 10 questions correctly.".to_string(),
            progress_tag: "answers_correct".to_string(),
            target: 10,
            coin_reward: 50,
            auto_grant_reward: false,
        },
        AchievementDef {
            id: "ladder_master".to_string(),
            display_name: "Ladder Master".to_string(),
            description: "Reach the top of a ladder.".to_string(),
            progress_tag: "ladder_wins".to_string(),
            target: 1,
            coin_reward: 100,
            auto_grant_reward: false,
        },
    ]
}

pub fn default_quests() -> Vec<QuestDefinition> {
    let quest = |id: &str, title: &str, tag: &str, target: u32, reward: u32| QuestDefinition {
        quest_id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        progress_tag: tag.to_string(),
        target,
        coin_reward: reward,
        eligible_for_daily: true,
    };

    vec![
        quest("answer_5", "Answer 5 questions", "answers_any", 5, 20),
        quest("answer_15", "Answer 15 questions", "answers_any", 15, 50),
        quest("correct_3", "Get 3 answers right", "answers_correct", 3, 25),
        quest("correct_10", "Get 10 answers right", "answers_correct", 10, 60),
        quest("ladder_win", "Finish a ladder", "ladder_wins", 1, 80),
        quest("login", "Open the game", "login", 1, 10),
    ]
}
