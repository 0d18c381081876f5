//! Error types for the game engine.
//!
//! `GameError` is what callers of the engine see; `ConfigError` and
//! `BankError` only surface while loading configuration or a question bank.

use crate::game_engine::models::{GameId, HelpType, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("player {player_id} already has an unfinished game")]
    ActiveGameExists { player_id: PlayerId },

    #[error("question bank has no questions for level {level}")]
    InsufficientQuestions { level: usize },

    #[error("game is already finished")]
    GameAlreadyFinished,

    #[error("help {0} was already used in this game")]
    HelpAlreadyUsed(HelpType),

    #[error("cannot take the money before answering a question")]
    NoProgressYet,

    #[error("no question at level {level}")]
    NoCurrentQuestion { level: usize },

    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("corrupt game record: {0}")]
    CorruptRecord(String),
}

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("prize table must have at least one level")]
    EmptyPrizeTable,

    #[error("prize at level {level} ({prize}) is lower than the previous level")]
    DecreasingPrize { level: usize, prize: u64 },

    #[error("fireproof level {level} is outside the prize table (0..{levels})")]
    FireproofOutOfRange { level: usize, levels: usize },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("question {id}: correct answer slot {slot} is not in 1..=4")]
    InvalidCorrectAnswer { id: u64, slot: u8 },

    #[error("duplicate question id {0}")]
    DuplicateQuestion(u64),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}
