//! # quiz_ladder
//!
//! Game progression engine for a "climb the ladder" quiz.
//!
//! A player answers a fixed sequence of increasingly hard questions. Each
//! correct answer moves them one level up the prize table; they may take the
//! money after any correct answer; a wrong answer or running out of time ends
//! the game and leaves them with the prize of the last fireproof level they
//! passed.
//!
//! ## How it works
//!
//! 1. Load an [`EngineConfig`] (TOML, every key optional) and a
//!    [`QuestionBank`] holding questions grouped by level.
//! 2. Build a [`GameService`] over a [`GameStore`] and an [`AccountService`].
//! 3. `create_game` draws one question per level, each with its own shuffled
//!    a/b/c/d mapping; `answer`, `take_money` and `use_help` drive the game.
//!    Terminal transitions with a prize credit the player's account.
//!
//! ## Key features
//!
//! - **Deterministic**: pass `rng_seed: Some(u64)` to reproduce question
//!   draws, answer shuffles and help outcomes; pair it with a [`ManualClock`]
//!   to test timeouts.
//! - **Pure status**: [`derive_status`] maps the persisted fields to a
//!   [`GameStatus`] without touching a game.
//! - **Safe under concurrency**: each game is updated under its own lock and
//!   a player can hold at most one unfinished game.
//!
//! ## Quick start
//!
//! ```rust
//! use quiz_ladder::{
//!     EngineConfig, GameService, GameStatus, InMemoryAccounts, InMemoryGameStore,
//!     InMemoryQuestionBank, PlayerId, Question, SystemClock,
//! };
//!
//! let questions = (0..15)
//!     .map(|level| Question {
//!         id: level as u64,
//!         level,
//!         text: format!("Question {level}"),
//!         answers: ["right".into(), "wrong".into(), "nope".into(), "no".into()],
//!         correct_answer: 1,
//!     })
//!     .collect();
//! let bank = InMemoryQuestionBank::new(questions).unwrap();
//!
//! let config = EngineConfig { rng_seed: Some(42), ..EngineConfig::default() };
//! let service = GameService::from_config(
//!     &config, bank, InMemoryGameStore::new(), InMemoryAccounts::new(), SystemClock,
//! ).unwrap();
//!
//! let game = service.create_game(PlayerId(1)).unwrap();
//! let letter = game.current_question().unwrap().correct_letter();
//! service.answer(game.id(), letter).unwrap();
//!
//! let outcome = service.take_money(game.id()).unwrap();
//! assert_eq!(outcome.status, GameStatus::Money);
//! assert_eq!(service.accounts().balance(PlayerId(1)), 100);
//! ```

pub mod game_engine;

// Convenience re-exports so callers can use `quiz_ladder::GameService`
// directly without reaching into `game_engine::`.
pub use game_engine::{
    derive_status, AccountError, AccountService, AnswerMapping, AudienceVotes, BankError, Clock,
    ConfigError, CreditIntent, EngineConfig, Game, GameError, GameFactory, GameId, GameQuestion,
    GameResult, GameRules, GameService, GameStatus, GameStore, HelpEngine, HelpPayload,
    HelpResults, HelpType, HelpUsage, InMemoryAccounts, InMemoryGameStore, InMemoryQuestionBank,
    Letter, ManualClock, PersistedGame, PlayerId, PrizeTable, Question, QuestionBank,
    StatusInputs, SystemClock, TurnOutcome,
};
