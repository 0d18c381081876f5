//! Persisted shape of a game.
//!
//! A game is stored as one `GameRecord` plus one `GameQuestionRecord` per
//! level, keyed by `(game_id, level)`. Question content is not copied: a
//! record keeps the question id and is resolved against the bank on restore.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game_engine::{
    bank::QuestionBank,
    config::GameRules,
    errors::{GameError, GameResult},
    game::{Game, HelpUsage},
    game_question::{AnswerMapping, GameQuestion, HelpResults},
    models::{GameId, PlayerId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub player_id: PlayerId,
    pub current_level: usize,
    pub is_failed: bool,
    pub finished_at: Option<DateTime<Utc>>,
    pub prize: u64,
    pub created_at: DateTime<Utc>,
    pub help_used: HelpUsage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuestionRecord {
    pub game_id: GameId,
    pub level: usize,
    pub question_id: u64,
    pub answer_mapping: AnswerMapping,
    #[serde(default)]
    pub help_results: HelpResults,
}

/// A game record together with its question records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedGame {
    pub game: GameRecord,
    pub questions: Vec<GameQuestionRecord>,
}

impl PersistedGame {
    pub fn to_json(&self) -> GameResult<String> {
        serde_json::to_string(self).map_err(|e| GameError::CorruptRecord(e.to_string()))
    }

    pub fn from_json(text: &str) -> GameResult<Self> {
        serde_json::from_str(text).map_err(|e| GameError::CorruptRecord(e.to_string()))
    }
}

impl Game {
    pub fn to_record(&self) -> PersistedGame {
        let game = GameRecord {
            id: self.id,
            player_id: self.player_id,
            current_level: self.current_level,
            is_failed: self.is_failed,
            finished_at: self.finished_at,
            prize: self.prize,
            created_at: self.created_at,
            help_used: self.help_used,
        };
        let questions = self
            .questions
            .iter()
            .map(|gq| GameQuestionRecord {
                game_id: self.id,
                level: gq.level(),
                question_id: gq.question_id(),
                answer_mapping: gq.mapping(),
                help_results: gq.help_results().clone(),
            })
            .collect();
        PersistedGame { game, questions }
    }

    /// Rebuild a game from its records, resolving questions through `bank`.
    pub fn restore<B: QuestionBank + ?Sized>(
        record: PersistedGame,
        bank: &B,
        rules: Arc<GameRules>,
    ) -> GameResult<Game> {
        let PersistedGame { game, mut questions } = record;
        let levels = rules.prize_table.levels();

        if questions.len() != levels {
            return Err(GameError::CorruptRecord(format!(
                "game {} has {} questions, expected {levels}",
                game.id,
                questions.len()
            )));
        }
        if game.current_level > levels {
            return Err(GameError::CorruptRecord(format!(
                "game {} is at level {} of {levels}",
                game.id, game.current_level
            )));
        }

        questions.sort_by_key(|q| q.level);
        let mut restored = Vec::with_capacity(levels);
        for (level, rec) in questions.into_iter().enumerate() {
            if rec.level != level || rec.game_id != game.id {
                return Err(GameError::CorruptRecord(format!(
                    "question record for level {} does not belong at level {level} of game {}",
                    rec.level, game.id
                )));
            }
            let question = bank.question(rec.question_id).ok_or_else(|| {
                GameError::CorruptRecord(format!("question {} is not in the bank", rec.question_id))
            })?;
            restored.push(GameQuestion::restore(question, rec.answer_mapping, rec.help_results));
        }

        Ok(Game {
            id: game.id,
            player_id: game.player_id,
            questions: restored,
            current_level: game.current_level,
            is_failed: game.is_failed,
            finished_at: game.finished_at,
            prize: game.prize,
            created_at: game.created_at,
            help_used: game.help_used,
            rules,
        })
    }
}
