use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::game_engine::{
    bank::QuestionBank,
    config::GameRules,
    errors::{GameError, GameResult},
    game::Game,
    game_question::GameQuestion,
    models::{GameId, PlayerId},
    store::GameStore,
};

/// Assembles new games: one question per level, freshly shuffled.
#[derive(Debug, Clone)]
pub struct GameFactory {
    rules: Arc<GameRules>,
}

impl GameFactory {
    pub fn new(rules: Arc<GameRules>) -> Self {
        GameFactory { rules }
    }

    pub fn rules(&self) -> &Arc<GameRules> {
        &self.rules
    }

    /// Create and store a game for `player_id`.
    ///
    /// Refuses with `ActiveGameExists` while the player has an unfinished
    /// game; the store re-checks on insert, so a concurrent creation that wins
    /// the race still leaves exactly one active game.
    pub fn create_for_player<B, S, R>(
        &self,
        player_id: PlayerId,
        bank: &B,
        store: &S,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> GameResult<Game>
    where
        B: QuestionBank + ?Sized,
        S: GameStore,
        R: Rng,
    {
        if store.find_active_game(player_id).is_some() {
            return Err(GameError::ActiveGameExists { player_id });
        }

        let questions = self.draw_questions(bank, rng)?;
        let id = GameId::from_random_bytes(rng.gen());
        let game = Game::new(id, player_id, questions, Arc::clone(&self.rules), now);
        store.insert(game.clone())?;

        tracing::info!(game_id = %id, player_id = %player_id, levels = game.questions().len(), "created game");
        Ok(game)
    }

    /// Pick one question uniformly at random for every level.
    pub fn draw_questions<B, R>(&self, bank: &B, rng: &mut R) -> GameResult<Vec<GameQuestion>>
    where
        B: QuestionBank + ?Sized,
        R: Rng,
    {
        (0..self.rules.prize_table.levels())
            .map(|level| {
                let mut candidates = bank.questions_at_level(level);
                if candidates.is_empty() {
                    return Err(GameError::InsufficientQuestions { level });
                }
                // Bank order is unspecified; sort so a seed always draws the same question.
                candidates.sort_by_key(|q| q.id);
                let question = candidates.swap_remove(rng.gen_range(0..candidates.len()));
                Ok(GameQuestion::new(question, rng))
            })
            .collect()
    }
}
