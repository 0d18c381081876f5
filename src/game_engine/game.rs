//! The game aggregate and its state machine.
//!
//! A `Game` is `InProgress` until it is won, cashed out, failed or timed out;
//! from then on every mutating call returns `GameAlreadyFinished`. Status is
//! never stored: it is derived from the persisted fields by
//! [`derive_status`](crate::game_engine::status::derive_status).
//!
//! Mutating calls take the current time and, for help, the RNG explicitly so
//! the caller decides where both come from. Each call either commits its
//! whole transition or returns an error with the game untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_engine::{
    config::GameRules,
    errors::{GameError, GameResult},
    game_question::{GameQuestion, HelpPayload},
    models::{CreditIntent, GameId, GameStatus, HelpType, Letter, PlayerId, TurnOutcome},
    status::{derive_status, StatusInputs},
};

/// Which help types this game has spent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpUsage {
    pub audience_help: bool,
    pub fifty_fifty: bool,
    pub friend_call: bool,
}

impl HelpUsage {
    pub fn is_used(&self, help: HelpType) -> bool {
        match help {
            HelpType::AudienceHelp => self.audience_help,
            HelpType::FiftyFifty   => self.fifty_fifty,
            HelpType::FriendCall   => self.friend_call,
        }
    }

    fn mark(&mut self, help: HelpType) {
        match help {
            HelpType::AudienceHelp => self.audience_help = true,
            HelpType::FiftyFifty   => self.fifty_fifty = true,
            HelpType::FriendCall   => self.friend_call = true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) id: GameId,
    pub(crate) player_id: PlayerId,
    pub(crate) questions: Vec<GameQuestion>,
    pub(crate) current_level: usize,
    pub(crate) is_failed: bool,
    pub(crate) finished_at: Option<DateTime<Utc>>,
    pub(crate) prize: u64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) help_used: HelpUsage,
    pub(crate) rules: Arc<GameRules>,
}

impl Game {
    /// A fresh game at level 0. `questions` must hold one entry per level,
    /// ordered by level.
    pub fn new(
        id: GameId,
        player_id: PlayerId,
        questions: Vec<GameQuestion>,
        rules: Arc<GameRules>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Game {
            id,
            player_id,
            questions,
            current_level: 0,
            is_failed: false,
            finished_at: None,
            prize: 0,
            created_at,
            help_used: HelpUsage::default(),
            rules,
        }
    }

    // ── Read accessors ──

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    /// Level of the last correctly answered question, if any.
    pub fn previous_level(&self) -> Option<usize> {
        self.current_level.checked_sub(1)
    }

    pub fn prize(&self) -> u64 {
        self.prize
    }

    pub fn is_failed(&self) -> bool {
        self.is_failed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn help_used(&self) -> HelpUsage {
        self.help_used
    }

    pub fn is_help_used(&self, help: HelpType) -> bool {
        self.help_used.is_used(help)
    }

    pub fn questions(&self) -> &[GameQuestion] {
        &self.questions
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Index of the last level.
    pub fn max_level(&self) -> usize {
        self.rules.prize_table.max_level()
    }

    pub fn status(&self) -> GameStatus {
        derive_status(&StatusInputs {
            created_at: self.created_at,
            finished_at: self.finished_at,
            is_failed: self.is_failed,
            current_level: self.current_level,
            max_level: self.max_level(),
            time_limit: self.rules.time_limit,
        })
    }

    pub fn current_question(&self) -> GameResult<&GameQuestion> {
        self.questions.get(self.current_level).ok_or_else(|| {
            tracing::error!(
                game_id = %self.id,
                level = self.current_level,
                "game has no question at its current level"
            );
            GameError::NoCurrentQuestion { level: self.current_level }
        })
    }

    pub fn previous_question(&self) -> Option<&GameQuestion> {
        self.previous_level().and_then(|l| self.questions.get(l))
    }

    /// True once more than the time limit has passed since creation.
    pub fn time_is_up(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > self.rules.time_limit
    }

    // ── Mutations ──

    /// Submit an answer for the current question.
    pub fn answer(&mut self, letter: Letter, now: DateTime<Utc>) -> GameResult<TurnOutcome> {
        self.ensure_in_progress()?;

        if self.time_is_up(now) {
            let credit = self.finish_failed(now);
            return Ok(self.outcome(Some(false), credit));
        }

        let correct = self.current_question()?.is_correct(letter);
        let credit = if !correct {
            self.finish_failed(now)
        } else {
            self.current_level += 1;
            if self.current_level > self.max_level() {
                let top = self.rules.prize_table.top_prize();
                self.finish(top, false, now)
            } else {
                None
            }
        };
        Ok(self.outcome(Some(correct), credit))
    }

    /// Cash out with the prize of the last correctly answered level.
    ///
    /// A game past its time limit times out instead; that outcome is returned
    /// as a committed transition, not an error.
    pub fn take_money(&mut self, now: DateTime<Utc>) -> GameResult<TurnOutcome> {
        self.ensure_in_progress()?;
        let Some(previous) = self.previous_level() else {
            return Err(GameError::NoProgressYet);
        };

        let credit = if self.time_is_up(now) {
            self.finish_failed(now)
        } else {
            let prize = self.rules.prize_table.prize_for(previous);
            self.finish(prize, false, now)
        };
        Ok(self.outcome(None, credit))
    }

    /// Spend a help type on the current question and return its payload.
    pub fn use_help<R: Rng>(&mut self, help: HelpType, rng: &mut R) -> GameResult<HelpPayload> {
        self.ensure_in_progress()?;
        if self.help_used.is_used(help) {
            return Err(GameError::HelpAlreadyUsed(help));
        }

        let level = self.current_level;
        let correct = self.current_question()?.correct_letter();
        let payload = self.rules.help.compute(help, correct, rng);
        self.questions[level].store_help(payload.clone())?;
        self.help_used.mark(help);
        Ok(payload)
    }

    /// Finish a stale game as timed out. Returns `None` when the game is
    /// already finished or still within its time limit.
    pub fn time_out(&mut self, now: DateTime<Utc>) -> Option<TurnOutcome> {
        if self.is_finished() || !self.time_is_up(now) {
            return None;
        }
        let credit = self.finish_failed(now);
        Some(self.outcome(None, credit))
    }

    fn ensure_in_progress(&self) -> GameResult<()> {
        if self.status() == GameStatus::InProgress {
            Ok(())
        } else {
            Err(GameError::GameAlreadyFinished)
        }
    }

    fn finish_failed(&mut self, now: DateTime<Utc>) -> Option<CreditIntent> {
        let kept = self.rules.prize_table.fireproof_prize_below(self.current_level);
        self.finish(kept, true, now)
    }

    /// Terminal transition. The prize never decreases.
    fn finish(&mut self, prize: u64, failed: bool, now: DateTime<Utc>) -> Option<CreditIntent> {
        self.prize = self.prize.max(prize);
        self.is_failed = failed;
        self.finished_at = Some(now);

        (self.prize > 0).then(|| CreditIntent {
            player_id: self.player_id,
            game_id: self.id,
            amount: self.prize,
        })
    }

    fn outcome(&self, correct: Option<bool>, credit: Option<CreditIntent>) -> TurnOutcome {
        TurnOutcome {
            correct,
            status: self.status(),
            level: self.current_level,
            prize: self.prize,
            credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_engine::{
        game_question::AnswerMapping,
        models::Question,
        prize_table::PrizeTable,
    };
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Every question shows its correct answer under "a".
    fn game_with(rules: GameRules) -> Game {
        let questions = (0..rules.prize_table.levels())
            .map(|level| {
                let q = Question {
                    id: level as u64 + 100,
                    level,
                    text: format!("Question {level}"),
                    answers: ["right".into(), "w1".into(), "w2".into(), "w3".into()],
                    correct_answer: 1,
                };
                GameQuestion::with_mapping(q, AnswerMapping::new([1, 2, 3, 4]).unwrap())
            })
            .collect();
        Game::new(GameId::from_random_bytes([7; 16]), PlayerId(1), questions, Arc::new(rules), t0())
    }

    fn game() -> Game {
        game_with(GameRules::default())
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        t0() + Duration::minutes(minutes)
    }

    fn climb(game: &mut Game, levels: usize) {
        for _ in 0..levels {
            let out = game.answer(Letter::A, at(1)).unwrap();
            assert_eq!(out.correct, Some(true));
        }
    }

    #[test]
    fn new_game_starts_at_level_zero() {
        let g = game();
        assert_eq!(g.status(), GameStatus::InProgress);
        assert_eq!(g.current_level(), 0);
        assert_eq!(g.previous_level(), None);
        assert_eq!(g.prize(), 0);
        assert!(g.previous_question().is_none());
        assert_eq!(g.current_question().unwrap().level(), 0);
    }

    #[test]
    fn correct_answer_advances_without_crediting() {
        let mut g = game();
        let out = g.answer(Letter::A, at(1)).unwrap();
        assert_eq!(out.status, GameStatus::InProgress);
        assert_eq!(out.level, 1);
        assert_eq!(out.prize, 0);
        assert_eq!(out.credit, None);
        assert_eq!(g.current_question().unwrap().level(), 1);
        assert_eq!(g.previous_question().unwrap().level(), 0);
    }

    #[test]
    fn answering_the_last_level_wins_top_prize() {
        let mut g = game();
        climb(&mut g, 14);
        let out = g.answer(Letter::A, at(2)).unwrap();
        assert_eq!(out.status, GameStatus::Won);
        assert_eq!(g.current_level(), 15);
        assert_eq!(g.prize(), 1_000_000);
        assert_eq!(out.credit.map(|c| c.amount), Some(1_000_000));
        assert!(g.is_finished());
    }

    #[test]
    fn wrong_answer_falls_back_to_fireproof_prize() {
        let rules = GameRules {
            prize_table: PrizeTable::new(PrizeTable::reference().prizes().to_vec(), vec![4, 9]).unwrap(),
            ..GameRules::default()
        };
        let mut g = game_with(rules);
        climb(&mut g, 5);
        let out = g.answer(Letter::C, at(3)).unwrap();
        assert_eq!(out.correct, Some(false));
        assert_eq!(out.status, GameStatus::Fail);
        assert_eq!(g.prize(), 1_000);
        assert_eq!(g.current_level(), 5);
        assert_eq!(out.credit.map(|c| c.amount), Some(1_000));
    }

    #[test]
    fn wrong_answer_before_first_milestone_keeps_nothing() {
        let mut g = game();
        climb(&mut g, 3);
        let out = g.answer(Letter::B, at(3)).unwrap();
        assert_eq!(out.status, GameStatus::Fail);
        assert_eq!(out.prize, 0);
        assert_eq!(out.credit, None);
    }

    #[test]
    fn late_answer_times_out_even_if_correct() {
        let mut g = game();
        climb(&mut g, 6);
        let out = g.answer(Letter::A, at(36)).unwrap();
        assert_eq!(out.correct, Some(false));
        assert_eq!(out.status, GameStatus::Timeout);
        assert_eq!(g.current_level(), 6);
        assert_eq!(g.prize(), 1_000);
        assert!(g.is_failed());
    }

    #[test]
    fn take_money_pays_previous_level() {
        let mut g = game();
        climb(&mut g, 5);
        let out = g.take_money(at(4)).unwrap();
        assert_eq!(out.status, GameStatus::Money);
        assert_eq!(g.prize(), 1_000);
        assert!(!g.is_failed());
        assert_eq!(out.credit.map(|c| c.amount), Some(1_000));

        assert_eq!(g.answer(Letter::A, at(5)), Err(GameError::GameAlreadyFinished));
        assert_eq!(g.take_money(at(5)), Err(GameError::GameAlreadyFinished));
        assert_eq!(g.prize(), 1_000);
    }

    #[test]
    fn take_money_needs_a_correct_answer() {
        let mut g = game();
        assert_eq!(g.take_money(at(1)), Err(GameError::NoProgressYet));
        assert!(!g.is_finished());
    }

    #[test]
    fn take_money_after_limit_times_out() {
        let mut g = game();
        climb(&mut g, 2);
        let out = g.take_money(at(40)).unwrap();
        assert_eq!(out.status, GameStatus::Timeout);
        assert_eq!(out.prize, 0);
    }

    #[test]
    fn help_is_usable_once_per_game() {
        let mut g = game();
        let mut rng = StdRng::seed_from_u64(1);
        let payload = g.use_help(HelpType::FiftyFifty, &mut rng).unwrap();
        let HelpPayload::FiftyFifty(pair) = payload else {
            panic!("expected fifty-fifty payload");
        };
        assert!(pair.contains(&Letter::A));
        assert!(g.is_help_used(HelpType::FiftyFifty));

        // Still refused on a later level.
        climb(&mut g, 1);
        assert_eq!(
            g.use_help(HelpType::FiftyFifty, &mut rng),
            Err(GameError::HelpAlreadyUsed(HelpType::FiftyFifty))
        );
        assert_eq!(g.questions()[0].fifty_fifty(), Some(pair));
        assert_eq!(g.questions()[1].fifty_fifty(), None);
        assert_eq!(g.current_level(), 1);
        assert_eq!(g.prize(), 0);
    }

    #[test]
    fn help_is_refused_on_finished_game() {
        let mut g = game();
        g.answer(Letter::D, at(1)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(g.use_help(HelpType::AudienceHelp, &mut rng), Err(GameError::GameAlreadyFinished));
        assert!(!g.is_help_used(HelpType::AudienceHelp));
    }

    #[test]
    fn time_out_only_fires_for_stale_games() {
        let mut g = game();
        assert_eq!(g.time_out(at(10)), None);
        let out = g.time_out(at(36)).unwrap();
        assert_eq!(out.status, GameStatus::Timeout);
        assert_eq!(out.correct, None);
        assert_eq!(g.time_out(at(50)), None);
        assert_eq!(g.finished_at(), Some(at(36)));
    }

    #[test]
    fn missing_question_is_reported() {
        let mut g = game();
        g.questions.truncate(2);
        climb(&mut g, 2);
        assert_eq!(g.current_question().unwrap_err(), GameError::NoCurrentQuestion { level: 2 });
        assert_eq!(g.answer(Letter::A, at(1)).unwrap_err(), GameError::NoCurrentQuestion { level: 2 });
        assert_eq!(g.current_level(), 2);
    }
}
