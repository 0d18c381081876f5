//! Core game engine: question draw, answers, prizes, help types and the
//! boundary seams a host plugs into.
//!
//! ## Module overview
//!
//! | Module          | Purpose |
//! |-----------------|---------|
//! | `models`        | Shared types: letters, questions, help types, status, turn outcomes |
//! | `errors`        | `GameError`, `ConfigError`, `BankError` |
//! | `prize_table`   | Prize per level and fireproof milestones |
//! | `bank`          | Read-only `QuestionBank` and an in-memory implementation |
//! | `game_question` | A question bound to a game level: answer mapping and help results |
//! | `help`          | Audience poll, fifty-fifty and friend call |
//! | `status`        | Pure status derivation from persisted fields |
//! | `game`          | The `Game` state machine |
//! | `factory`       | `GameFactory`: one active game per player, question draw |
//! | `record`        | Persisted shape of a game and restore from it |
//! | `store`         | `GameStore` boundary and the in-memory store with per-game locks |
//! | `accounts`      | `AccountService` credit seam and in-memory balances |
//! | `config`        | TOML configuration validated into `GameRules` |
//! | `service`       | `GameService` facade: clock, RNG, locking, crediting |

pub mod accounts;
pub mod bank;
pub mod config;
pub mod errors;
pub mod factory;
pub mod game;
pub mod game_question;
pub mod help;
pub mod models;
pub mod prize_table;
pub mod record;
pub mod service;
pub mod status;
pub mod store;

// Re-export the public API surface so callers can use
// `game_engine::GameService` without reaching into sub-modules.
pub use accounts::{AccountError, AccountService, InMemoryAccounts};
pub use bank::{InMemoryQuestionBank, QuestionBank};
pub use config::{EngineConfig, GameRules};
pub use errors::{BankError, ConfigError, GameError, GameResult};
pub use factory::GameFactory;
pub use game::{Game, HelpUsage};
pub use game_question::{AnswerMapping, AudienceVotes, GameQuestion, HelpPayload, HelpResults};
pub use help::HelpEngine;
pub use models::{
    CreditIntent, GameId, GameStatus, HelpType, Letter, PlayerId, Question, TurnOutcome,
};
pub use prize_table::PrizeTable;
pub use record::{GameQuestionRecord, GameRecord, PersistedGame};
pub use service::{Clock, GameService, ManualClock, SystemClock};
pub use status::{derive_status, StatusInputs};
pub use store::{GameStore, InMemoryGameStore};
