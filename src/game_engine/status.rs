use chrono::{DateTime, Duration, Utc};

use crate::game_engine::models::GameStatus;

/// The persisted fields a game's status is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInputs {
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub is_failed: bool,
    pub current_level: usize,
    pub max_level: usize,
    pub time_limit: Duration,
}

/// Map persisted fields to a status. A timed-out game is also marked failed,
/// so the timeout check runs before the plain failure check.
pub fn derive_status(s: &StatusInputs) -> GameStatus {
    let Some(finished_at) = s.finished_at else {
        return GameStatus::InProgress;
    };

    if s.is_failed && finished_at - s.created_at > s.time_limit {
        GameStatus::Timeout
    } else if s.is_failed {
        GameStatus::Fail
    } else if s.current_level > s.max_level {
        GameStatus::Won
    } else {
        GameStatus::Money
    }
}
