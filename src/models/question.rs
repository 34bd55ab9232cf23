use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LadderError;

pub const CHOICE_COUNT: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub difficulty: Difficulty,
    pub text: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    /// Checks the authored shape: exactly three choices and an in-range answer.
    pub fn validate(&self) -> Result<(), LadderError> {
        if self.choices.len() != CHOICE_COUNT {
            return Err(LadderError::InvalidQuestion {
                id: self.id,
                reason: format!(
                    "expected {} choices, found {}",
                    CHOICE_COUNT,
                    self.choices.len()
                ),
            });
        }
        if self.correct_index >= self.choices.len() {
            return Err(LadderError::InvalidQuestion {
                id: self.id,
                reason: format!("correct index {} out of range", self.correct_index),
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuestionPack {
    pub name: String,
    pub questions: Vec<Question>,
}

impl QuestionPack {
    pub fn from_json(text: &str) -> Result<QuestionPack, LadderError> {
        let pack: QuestionPack = serde_json::from_str(text)?;
        Ok(pack)
    }

    pub fn builtin() -> Result<QuestionPack, LadderError> {
        QuestionPack::from_json(include_str!("../../assets/questions.json"))
    }
}

#[cfg(test)]
pub fn test_question(id: u32, difficulty: Difficulty, correct_index: usize) -> Question {
    Question {
        id,
        difficulty,
        text: format!("Question {}?", id),
        choices: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        correct_index,
        explanation: format!("Answer {} is right.", correct_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_defaults_to_easy() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
        let parsed: Difficulty = serde_json::from_str("\"Expert\"").unwrap();
        assert_eq!(parsed, Difficulty::Expert);
    }

    #[test]
    fn validate_rejects_wrong_choice_count() {
        let mut question = test_question(1, Difficulty::Easy, 0);
        question.choices.pop();
        assert!(question.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        let question = test_question(1, Difficulty::Easy, 3);
        assert!(matches!(
            question.validate(),
            Err(LadderError::InvalidQuestion { id: 1, .. })
        ));
    }

    #[test]
    fn builtin_pack_parses() {
        let pack = QuestionPack::builtin().unwrap();
        assert!(pack
            .questions
            .iter()
            .any(|question| question.difficulty == Difficulty::Easy));
        assert!(pack.questions.iter().all(|question| question.validate().is_ok()));
    }

    #[test]
    fn explanation_defaults_to_empty() {
        let text = r#"{"name":"p","questions":[{"id":7,"difficulty":"Hard","text":"?","choices":["a","b","c"],"correct_index":2}]}"#;
        let pack = QuestionPack::from_json(text).unwrap();
        assert_eq!(pack.questions[0].explanation, "");
        assert_eq!(pack.questions[0].difficulty, Difficulty::Hard);
    }
}
