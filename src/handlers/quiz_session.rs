use std::{collections::HashSet, rc::Rc, time::Duration};

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::LadderResult,
    handlers::{
        progress_store::ProgressStore,
        question_pool::QuestionProvider,
        scheduler::{Clock, Scheduler},
    },
    models::{
        events::QuizEvent,
        question::{Difficulty, Question},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingAnswer,
    Scoring,
    AwaitingAdvance,
    Completed,
    NoQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    DismissRewardPopup,
    ShowQuestionOnArrive,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub target_correct: u32,
    pub arrive_delay: Duration,
    pub reward_popup: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            target_correct: 10,
            arrive_delay: Duration::from_millis(500),
            reward_popup: Duration::from_millis(1200),
        }
    }
}

/// Coins for a correct answer given the wrong attempts already made on the level.
pub fn reward_for_streak(wrong_streak: u32) -> u32 {
    match wrong_streak {
        0 => 10,
        1 => 7,
        2 => 5,
        _ => 3,
    }
}

pub struct QuizSession {
    difficulty: Difficulty,
    options: SessionOptions,
    provider: Box<dyn QuestionProvider>,
    progress: ProgressStore,
    clock: Rc<dyn Clock>,
    scheduler: Scheduler<Continuation>,
    listeners: Vec<UnboundedSender<QuizEvent>>,

    state: SessionState,
    run_id: Uuid,
    level: u32,
    current: Option<Question>,
    asked: HashSet<u32>,
    inputs_enabled: bool,
    last_answer_correct: bool,
    last_reward: u32,
    wrong_streak: u32,
    correct_so_far: u32,
    coins: u32,
}

impl QuizSession {
    pub fn new(
        difficulty: Difficulty,
        options: SessionOptions,
        provider: Box<dyn QuestionProvider>,
        progress: ProgressStore,
        clock: Rc<dyn Clock>,
    ) -> QuizSession {
        let mut session = QuizSession {
            difficulty,
            options: SessionOptions {
                target_correct: options.target_correct.max(1),
                ..options
            },
            provider,
            progress,
            clock,
            scheduler: Scheduler::new(),
            listeners: Vec::new(),
            state: SessionState::Idle,
            run_id: Uuid::new_v4(),
            level: 1,
            current: None,
            asked: HashSet::new(),
            inputs_enabled: false,
            last_answer_correct: false,
            last_reward: 0,
            wrong_streak: 0,
            correct_so_far: 0,
            coins: 0,
        };
        session.level = session.stored_level();
        session
    }

    pub fn init(&mut self) {
        self.provider.initialize();
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<QuizEvent> {
        let (tx, rx) = unbounded();
        self.listeners.push(tx);
        rx
    }

    pub fn set_target_correct(&mut self, count: u32) {
        self.options.target_correct = count.max(1);
        self.level = self.level.min(self.options.target_correct);
    }

    pub fn reset_run(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!("Cancelled {} pending continuations", cancelled);
        }

        self.state = SessionState::Idle;
        self.run_id = Uuid::new_v4();
        self.level = self.stored_level();
        self.current = None;
        self.asked.clear();
        self.inputs_enabled = false;
        self.last_answer_correct = false;
        self.last_reward = 0;
        self.wrong_streak = 0;
        self.correct_so_far = 0;
        self.coins = 0;

        info!("New {} run {} at level {}", self.difficulty, self.run_id, self.level);
        self.emit(QuizEvent::CoinsChanged { total: 0 });
    }

    /// Shows a question from `Idle` or `NoQuestions`. After an answer only
    /// `continue_to_next` moves the session on.
    pub fn show_next_question(&mut self) -> Option<&Question> {
        match self.state {
            SessionState::Idle | SessionState::NoQuestions => self.present_question(),
            state => {
                debug!("Ignoring show_next_question while {:?}", state);
                None
            }
        }
    }

    fn present_question(&mut self) -> Option<&Question> {
        self.provider.initialize();
        match self.provider.next(self.difficulty, &self.asked) {
            Some(question) => {
                self.asked.insert(question.id);
                self.inputs_enabled = true;
                self.state = SessionState::AwaitingAnswer;
                self.emit(QuizEvent::QuestionShown {
                    question_id: question.id,
                    level: self.level,
                });
                self.current = Some(question);
                self.current.as_ref()
            }
            None => {
                warn!(
                    "No questions available for {} at level {}",
                    self.difficulty, self.level
                );
                self.current = None;
                self.inputs_enabled = false;
                self.state = SessionState::NoQuestions;
                self.emit(QuizEvent::NoQuestionsAvailable {
                    difficulty: self.difficulty,
                    level: self.level,
                });
                None
            }
        }
    }

    /// Scores a choice. Returns the correctness, or `None` when the session is
    /// not waiting for an answer.
    pub fn on_option_selected(&mut self, choice: usize) -> Option<bool> {
        if self.state != SessionState::AwaitingAnswer || !self.inputs_enabled {
            debug!("Ignoring answer {} while {:?}", choice, self.state);
            return None;
        }
        let question = self.current.as_ref()?;

        self.inputs_enabled = false;
        self.state = SessionState::Scoring;

        let correct = question.is_correct(choice);
        let explanation = question.explanation.clone();
        self.last_answer_correct = correct;
        self.emit(QuizEvent::Answered {
            correct,
            choice,
            explanation,
        });

        if correct {
            let reward = reward_for_streak(self.wrong_streak);
            self.last_reward = reward;
            self.coins += reward;
            self.emit(QuizEvent::RewardGranted {
                amount: reward,
                wrong_streak: self.wrong_streak,
            });
            self.emit(QuizEvent::CoinsChanged { total: self.coins });

            if self.options.reward_popup.is_zero() {
                self.state = SessionState::AwaitingAdvance;
            } else {
                self.scheduler.schedule(
                    self.clock.now(),
                    self.options.reward_popup,
                    Continuation::DismissRewardPopup,
                );
            }
        } else {
            self.last_reward = 0;
            self.wrong_streak += 1;
            self.state = SessionState::AwaitingAdvance;
        }

        Some(correct)
    }

    /// Moves on after the explanation. Returns `false` when there was nothing
    /// to continue from.
    pub fn continue_to_next(&mut self) -> bool {
        if self.state != SessionState::AwaitingAdvance {
            debug!("Ignoring continue while {:?}", self.state);
            return false;
        }

        if !self.last_answer_correct {
            self.present_question();
            return true;
        }

        self.wrong_streak = 0;
        self.correct_so_far += 1;
        if let Err(err) = self.save_answer_progress() {
            warn!("Could not save progress for {}: {}", self.difficulty, err);
        }

        if self.reached_target() {
            self.state = SessionState::Completed;
            self.current = None;
            // The next run starts from the bottom of the ladder.
            if let Err(err) = self.progress.save_level(self.difficulty, 1) {
                warn!("Could not save level for {}: {}", self.difficulty, err);
            }
            info!(
                "Run {} completed: {} correct, {} coins",
                self.run_id, self.correct_so_far, self.coins
            );
            self.emit(QuizEvent::RunCompleted {
                run_id: self.run_id,
                correct: self.correct_so_far,
                coins: self.coins,
            });
            return true;
        }

        self.level = (self.level + 1).min(self.options.target_correct);
        if let Err(err) = self.progress.save_level(self.difficulty, self.level) {
            warn!("Could not save level for {}: {}", self.difficulty, err);
        }
        self.emit(QuizEvent::LevelAdvanced { level: self.level });

        self.state = SessionState::Idle;
        self.current = None;
        if self.options.arrive_delay.is_zero() {
            self.show_next_question();
        } else {
            self.scheduler.schedule(
                self.clock.now(),
                self.options.arrive_delay,
                Continuation::ShowQuestionOnArrive,
            );
        }
        true
    }

    /// Resumes every continuation whose delay has elapsed.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for continuation in self.scheduler.take_due(now) {
            match continuation {
                Continuation::DismissRewardPopup => {
                    if self.state == SessionState::Scoring {
                        self.state = SessionState::AwaitingAdvance;
                        self.emit(QuizEvent::RewardPopupDismissed {});
                    }
                }
                Continuation::ShowQuestionOnArrive => {
                    if self.state == SessionState::Idle {
                        self.show_next_question();
                    }
                }
            }
        }
    }

    pub fn next_wakeup(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn has_pending_continuation(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn reached_target(&self) -> bool {
        self.correct_so_far >= self.options.target_correct
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn wrong_streak(&self) -> u32 {
        self.wrong_streak
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_so_far
    }

    pub fn target_correct(&self) -> u32 {
        self.options.target_correct
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn inputs_enabled(&self) -> bool {
        self.inputs_enabled
    }

    pub fn asked_ids(&self) -> &HashSet<u32> {
        &self.asked
    }

    pub fn last_reward(&self) -> u32 {
        self.last_reward
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    fn stored_level(&self) -> u32 {
        match self.progress.load_level(self.difficulty, 1) {
            Ok(level) => level.min(self.options.target_correct),
            Err(err) => {
                warn!("Could not load level for {}: {}", self.difficulty, err);
                1
            }
        }
    }

    fn save_answer_progress(&self) -> LadderResult<()> {
        let correct = self.progress.load_correct_count(self.difficulty)?;
        let coins = self.progress.load_coins(self.difficulty)?;
        self.progress
            .save_correct_count(self.difficulty, correct.saturating_add(1))?;
        self.progress
            .save_coins(self.difficulty, coins.saturating_add(self.last_reward))
    }

    fn emit(&mut self, event: QuizEvent) {
        self.listeners
            .retain(|listener| listener.unbounded_send(event.clone()).is_ok());
    }
}
