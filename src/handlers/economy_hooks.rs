use futures_channel::mpsc::UnboundedReceiver;
use log::{info, warn};

use crate::{
    error::LadderResult,
    handlers::{
        achievements::AchievementTracker, daily_quests::DailyQuestTracker, wallet::CoinWallet,
    },
    models::events::QuizEvent,
};

pub const TAG_ANSWERS_ANY: &str = "answers_any";
pub const TAG_ANSWERS_CORRECT: &str = "answers_correct";
pub const TAG_LADDER_WINS: &str = "ladder_wins";

/// Routes quiz events to the wallet and the progress-tag trackers.
pub struct EconomyHooks {
    pub wallet: CoinWallet,
    pub achievements: AchievementTracker,
    pub quests: DailyQuestTracker,
}

impl EconomyHooks {
    pub fn new(
        wallet: CoinWallet,
        achievements: AchievementTracker,
        quests: DailyQuestTracker,
    ) -> EconomyHooks {
        EconomyHooks {
            wallet,
            achievements,
            quests,
        }
    }

    /// Applies every event already queued on `events` and returns how many were handled.
    pub fn drain(&mut self, events: &mut UnboundedReceiver<QuizEvent>) -> usize {
        let mut handled = 0;
        while let Ok(Some(event)) = events.try_next() {
            if let Err(err) = self.handle(&event) {
                warn!("Economy update failed for {:?}: {}", event, err);
            }
            handled += 1;
        }
        handled
    }

    pub fn handle(&mut self, event: &QuizEvent) -> LadderResult<()> {
        match event {
            QuizEvent::Answered { correct, .. } => {
                self.report(TAG_ANSWERS_ANY)?;
                if *correct {
                    self.report(TAG_ANSWERS_CORRECT)?;
                }
            }
            QuizEvent::RewardGranted { amount, .. } => {
                self.wallet.add(*amount)?;
            }
            QuizEvent::RunCompleted { run_id, .. } => {
                info!("Ladder win recorded for run {}", run_id);
                self.report(TAG_LADDER_WINS)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Feeds `tag` to both trackers. A failure in one does not stop the other.
    pub fn report(&mut self, tag: &str) -> LadderResult<()> {
        let achievements = self.achievements.report(tag, 1, &mut self.wallet);
        let quests = self.quests.report(tag, 1);
        for id in achievements? {
            info!("Unlocked achievement {}", id);
        }
        quests
    }
}
