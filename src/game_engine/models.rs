use std::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    /// Build an id from random bytes so seeded runs produce the same ids.
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        GameId(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Questions and answer letters
// ---------------------------------------------------------------------------

/// One of the four display letters an answer is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    /// Position of the letter in `ALL` (a = 0).
    pub fn index(self) -> usize {
        match self {
            Letter::A => 0,
            Letter::B => 1,
            Letter::C => 2,
            Letter::D => 3,
        }
    }

    /// Uppercase label, as shown to players ("A".."D").
    pub fn label(self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        }
    }

    /// Parse a letter as submitted by a client; case-insensitive.
    pub fn parse(s: &str) -> Option<Letter> {
        match s.trim() {
            "a" | "A" => Some(Letter::A),
            "b" | "B" => Some(Letter::B),
            "c" | "C" => Some(Letter::C),
            "d" | "D" => Some(Letter::D),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Letter::A => write!(f, "a"),
            Letter::B => write!(f, "b"),
            Letter::C => write!(f, "c"),
            Letter::D => write!(f, "d"),
        }
    }
}

/// A question as it lives in the question bank. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    /// Difficulty level, 0 = easiest.
    pub level: usize,
    pub text: String,
    pub answers: [String; 4],
    /// 1-based slot of the correct entry in `answers`.
    pub correct_answer: u8,
}

impl Question {
    /// Answer text for a 1-based slot.
    pub fn answer(&self, slot: u8) -> Option<&str> {
        match slot {
            1..=4 => self.answers.get(slot as usize - 1).map(String::as_str),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Help types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpType {
    AudienceHelp,
    FiftyFifty,
    FriendCall,
}

impl HelpType {
    pub const ALL: [HelpType; 3] = [HelpType::AudienceHelp, HelpType::FiftyFifty, HelpType::FriendCall];
}

impl fmt::Display for HelpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelpType::AudienceHelp => write!(f, "audience_help"),
            HelpType::FiftyFifty   => write!(f, "fifty_fifty"),
            HelpType::FriendCall   => write!(f, "friend_call"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game status and turn results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    /// The player took the money.
    Money,
    Fail,
    Timeout,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in_progress"),
            GameStatus::Won        => write!(f, "won"),
            GameStatus::Money      => write!(f, "money"),
            GameStatus::Fail       => write!(f, "fail"),
            GameStatus::Timeout    => write!(f, "timeout"),
        }
    }
}

/// Request for the account service to credit a finalized prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditIntent {
    pub player_id: PlayerId,
    pub game_id: GameId,
    pub amount: u64,
}

/// What a state-changing call did to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Verdict on the submitted letter; `None` for cash-out and expiry.
    /// A timed-out answer is reported as incorrect.
    pub correct: Option<bool>,
    pub status: GameStatus,
    pub level: usize,
    pub prize: u64,
    /// Present when the call finished the game with a non-zero prize.
    pub credit: Option<CreditIntent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_parse_case_insensitively() {
        assert_eq!(Letter::parse("b"), Some(Letter::B));
        assert_eq!(Letter::parse(" D "), Some(Letter::D));
        assert_eq!(Letter::parse("e"), None);
    }

    #[test]
    fn letter_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Letter::C).unwrap(), "\"c\"");
        assert_eq!(Letter::C.label(), "C");
    }

    #[test]
    fn question_answer_uses_one_based_slots() {
        let q = Question {
            id: 1,
            level: 0,
            text: "2 + 2?".into(),
            answers: ["4".into(), "3".into(), "5".into(), "22".into()],
            correct_answer: 1,
        };
        assert_eq!(q.answer(1), Some("4"));
        assert_eq!(q.answer(4), Some("22"));
        assert_eq!(q.answer(0), None);
        assert_eq!(q.answer(5), None);
    }
}
