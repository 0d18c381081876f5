//! Read-only source of questions.

use std::collections::{BTreeMap, HashMap};

use crate::game_engine::{errors::BankError, models::Question};

/// Questions grouped by difficulty level. The engine only reads from it.
pub trait QuestionBank: Send + Sync {
    /// All questions at `level`, in no particular order.
    fn questions_at_level(&self, level: usize) -> Vec<Question>;

    /// Look up a question by id (used when restoring persisted games).
    fn question(&self, id: u64) -> Option<Question>;
}

/// A bank held in memory, e.g. loaded from a JSON array of questions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionBank {
    by_level: BTreeMap<usize, Vec<Question>>,
    by_id: HashMap<u64, Question>,
}

impl InMemoryQuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let mut bank = InMemoryQuestionBank::default();
        for q in questions {
            if !(1..=4).contains(&q.correct_answer) {
                return Err(BankError::InvalidCorrectAnswer { id: q.id, slot: q.correct_answer });
            }
            if bank.by_id.contains_key(&q.id) {
                return Err(BankError::DuplicateQuestion(q.id));
            }
            bank.by_level.entry(q.level).or_default().push(q.clone());
            bank.by_id.insert(q.id, q);
        }
        Ok(bank)
    }

    pub fn from_json(text: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(text)?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Number of questions per level, for diagnostics.
    pub fn level_counts(&self) -> BTreeMap<usize, usize> {
        self.by_level.iter().map(|(&l, qs)| (l, qs.len())).collect()
    }
}

impl QuestionBank for InMemoryQuestionBank {
    fn questions_at_level(&self, level: usize) -> Vec<Question> {
        self.by_level.get(&level).cloned().unwrap_or_default()
    }

    fn question(&self, id: u64) -> Option<Question> {
        self.by_id.get(&id).cloned()
    }
}
