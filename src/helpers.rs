use crate::models::{
    commands::PlayerCommand,
    events::QuizEvent,
    question::{Question, CHOICE_COUNT},
};

/// Parses one input line. Answers are 1-based on screen and 0-based inside.
pub fn parse_command(line: &str) -> Result<PlayerCommand, String> {
    let input = line.trim().to_lowercase();
    if let Some((verb, item)) = input.split_once(char::is_whitespace) {
        let item_id = item.trim().to_string();
        return match verb {
            "buy" => Ok(PlayerCommand::Buy { item_id }),
            "equip" => Ok(PlayerCommand::Equip { item_id }),
            "sell" => Ok(PlayerCommand::Sell { item_id }),
            _ => Err(format!("Unknown command: {}", line.trim())),
        };
    }

    let command = match input.as_str() {
        "s" | "start" => PlayerCommand::Start,
        "n" | "next" | "" => PlayerCommand::Continue,
        "r" | "reset" => PlayerCommand::ResetRun,
        "c" | "clear" => PlayerCommand::ClearProgress,
        "claim" => PlayerCommand::ClaimAll,
        "shop" => PlayerCommand::Shop,
        "?" | "status" => PlayerCommand::Status,
        "q" | "quit" | "exit" => PlayerCommand::Quit,
        other => match other.parse::<usize>() {
            Ok(number) if (1..=CHOICE_COUNT).contains(&number) => PlayerCommand::Answer {
                choice: number - 1,
            },
            _ => return Err(format!("Unknown command: {}", line.trim())),
        },
    };
    Ok(command)
}

pub fn render_question(question: &Question, level: u32) -> String {
    let mut text = format!("Level {}: {}\n", level, question.text);
    for (index, choice) in question.choices.iter().enumerate() {
        text.push_str(&format!("  {}) {}\n", index + 1, choice));
    }
    text
}

/// The line shown to the player for an event, if any.
pub fn describe_event(event: &QuizEvent) -> Option<String> {
    let text = match event {
        QuizEvent::NoQuestionsAvailable { .. } => "No questions available.".to_string(),
        QuizEvent::Answered {
            correct,
            explanation,
            ..
        } => {
            let prefix = if *correct { "Correct! " } else { "Not quite. " };
            format!("{}{}  [n: next]", prefix, explanation)
        }
        QuizEvent::RewardGranted { amount, .. } => format!("+{} coins", amount),
        QuizEvent::LevelAdvanced { level } => format!("Climbing to level {}...", level),
        QuizEvent::RunCompleted { correct, coins, .. } => format!(
            "You reached the top! {} correct answers, {} coins.",
            correct, coins
        ),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_one_based() {
        assert_eq!(parse_command("1"), Ok(PlayerCommand::Answer { choice: 0 }));
        assert_eq!(parse_command(" 3 \n"), Ok(PlayerCommand::Answer { choice: 2 }));
        assert!(parse_command("0").is_err());
        assert!(parse_command("4").is_err());
    }

    #[test]
    fn words_and_shortcuts_parse() {
        assert_eq!(parse_command("N"), Ok(PlayerCommand::Continue));
        assert_eq!(parse_command(""), Ok(PlayerCommand::Continue));
        assert_eq!(parse_command("reset"), Ok(PlayerCommand::ResetRun));
        assert_eq!(parse_command("q"), Ok(PlayerCommand::Quit));
        assert!(parse_command("jump").is_err());
    }

    #[test]
    fn shop_commands_take_an_item_id() {
        assert_eq!(parse_command("shop"), Ok(PlayerCommand::Shop));
        assert_eq!(
            parse_command("Buy  char_poppi"),
            Ok(PlayerCommand::Buy {
                item_id: "char_poppi".to_string()
            })
        );
        assert_eq!(
            parse_command("sell hat_star"),
            Ok(PlayerCommand::Sell {
                item_id: "hat_star".to_string()
            })
        );
        assert!(parse_command("fly away").is_err());
    }

    #[test]
    fn question_lists_numbered_choices() {
        let question = Question {
            id: 2,
            difficulty: crate::models::question::Difficulty::Easy,
            text: "2 + 3 = ?".to_string(),
            choices: vec!["4".to_string(), "5".to_string(), "6".to_string()],
            correct_index: 1,
            explanation: "2 plus 3 equals 5.".to_string(),
        };
        let text = render_question(&question, 4);
        assert!(text.starts_with("Level 4: 2 + 3 = ?"));
        assert!(text.contains("  2) 5\n"));
    }

    #[test]
    fn silent_events_have_no_text() {
        assert_eq!(describe_event(&QuizEvent::CoinsChanged { total: 3 }), None);
        assert_eq!(
            describe_event(&QuizEvent::Answered {
                correct: false,
                choice: 0,
                explanation: "Dolphins are mammals.".to_string(),
            }),
            Some("Not quite. Dolphins are mammals.  [n: next]".to_string())
        );
    }
}
