use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
};

use log::{info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    error::LadderResult,
    models::question::{Difficulty, Question, QuestionPack},
};

pub trait QuestionProvider {
    /// Loads the questions. Only the first call has any effect.
    fn initialize(&mut self);

    /// A random question of `difficulty` whose id is not in `excluded`, or `None`
    /// once every question of that difficulty has been excluded.
    fn next(&mut self, difficulty: Difficulty, excluded: &HashSet<u32>) -> Option<Question>;
}

pub enum PackSource {
    Builtin,
    File(PathBuf),
    Inline(QuestionPack),
}

pub struct QuestionPool {
    source: Option<PackSource>,
    by_difficulty: HashMap<Difficulty, Vec<Question>>,
    rng: StdRng,
    initialized: bool,
}

impl QuestionPool {
    pub fn new(source: PackSource) -> QuestionPool {
        QuestionPool::with_rng(source, StdRng::from_entropy())
    }

    pub fn with_rng(source: PackSource, rng: StdRng) -> QuestionPool {
        QuestionPool {
            source: Some(source),
            by_difficulty: HashMap::new(),
            rng,
            initialized: false,
        }
    }

    pub fn from_questions(questions: Vec<Question>, seed: u64) -> QuestionPool {
        let pack = QuestionPack {
            name: "inline".to_string(),
            questions,
        };
        QuestionPool::with_rng(PackSource::Inline(pack), StdRng::seed_from_u64(seed))
    }

    pub fn len(&self, difficulty: Difficulty) -> usize {
        self.by_difficulty
            .get(&difficulty)
            .map(|questions| questions.len())
            .unwrap_or(0)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn load_source(source: PackSource) -> LadderResult<QuestionPack> {
        match source {
            PackSource::Builtin => QuestionPack::builtin(),
            PackSource::File(path) => {
                let text = std::fs::read_to_string(&path)?;
                QuestionPack::from_json(&text)
            }
            PackSource::Inline(pack) => Ok(pack),
        }
    }

    fn insert_pack(&mut self, pack: QuestionPack) {
        let mut seen = HashSet::<(Difficulty, u32)>::new();
        for question in pack.questions {
            if let Err(err) = question.validate() {
                warn!("Skipping question from pack '{}': {}", pack.name, err);
                continue;
            }
            if !seen.insert((question.difficulty, question.id)) {
                warn!(
                    "Skipping duplicate question id {} in {} pool",
                    question.id, question.difficulty
                );
                continue;
            }
            self.by_difficulty
                .entry(question.difficulty)
                .or_default()
                .push(question);
        }

        for difficulty in Difficulty::ALL {
            let count = self.len(difficulty);
            if count == 0 {
                warn!("No questions loaded for {}", difficulty);
            } else {
                info!("Loaded {} {} questions", count, difficulty);
            }
        }
    }
}

impl QuestionProvider for QuestionPool {
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let source = match self.source.take() {
            Some(source) => source,
            None => return,
        };
        match QuestionPool::load_source(source) {
            Ok(pack) => self.insert_pack(pack),
            Err(err) => warn!("Question pack could not be loaded: {}", err),
        }
    }

    fn next(&mut self, difficulty: Difficulty, excluded: &HashSet<u32>) -> Option<Question> {
        let pool = self.by_difficulty.get(&difficulty)?;
        let fresh: Vec<&Question> = pool
            .iter()
            .filter(|question| !excluded.contains(&question.id))
            .collect();

        fresh.choose(&mut self.rng).map(|question| (*question).clone())
    }
}
