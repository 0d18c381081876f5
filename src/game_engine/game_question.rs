//! A question bound to one level of one game.
//!
//! Each `GameQuestion` owns the letter → answer-slot permutation fixed when the
//! game was created, and the results of any help used on it.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_engine::{
    errors::{GameError, GameResult},
    models::{HelpType, Letter, Question},
};

// ---------------------------------------------------------------------------
// Answer mapping
// ---------------------------------------------------------------------------

/// Maps each display letter to a 1-based answer slot of the question.
/// `slots[Letter::B.index()] == 3` means "b" shows the question's third answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u8; 4]", into = "[u8; 4]")]
pub struct AnswerMapping {
    slots: [u8; 4],
}

impl AnswerMapping {
    /// Build a mapping from an explicit permutation of `1..=4`.
    pub fn new(slots: [u8; 4]) -> GameResult<Self> {
        let mut seen = [false; 4];
        for &slot in &slots {
            if !(1..=4).contains(&slot) || seen[slot as usize - 1] {
                return Err(GameError::CorruptRecord(format!(
                    "answer mapping {slots:?} is not a permutation of 1..=4"
                )));
            }
            seen[slot as usize - 1] = true;
        }
        Ok(AnswerMapping { slots })
    }

    /// Fisher-Yates shuffle of the four slots.
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut slots = [1u8, 2, 3, 4];
        for i in (1..slots.len()).rev() {
            let j = rng.gen_range(0..=i);
            slots.swap(i, j);
        }
        AnswerMapping { slots }
    }

    pub fn slot(&self, letter: Letter) -> u8 {
        self.slots[letter.index()]
    }

    /// The letter that shows `slot`.
    pub fn letter_for(&self, slot: u8) -> Option<Letter> {
        Letter::ALL.into_iter().find(|&l| self.slot(l) == slot)
    }

    pub fn slots(&self) -> [u8; 4] {
        self.slots
    }
}

impl TryFrom<[u8; 4]> for AnswerMapping {
    type Error = GameError;

    fn try_from(slots: [u8; 4]) -> Result<Self, Self::Error> {
        AnswerMapping::new(slots)
    }
}

impl From<AnswerMapping> for [u8; 4] {
    fn from(m: AnswerMapping) -> Self {
        m.slots
    }
}

// ---------------------------------------------------------------------------
// Help payloads
// ---------------------------------------------------------------------------

/// Simulated audience vote, percent per letter.
pub type AudienceVotes = BTreeMap<Letter, u8>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "help_type", content = "payload", rename_all = "snake_case")]
pub enum HelpPayload {
    AudienceHelp(AudienceVotes),
    /// The two letters that stay selectable.
    FiftyFifty([Letter; 2]),
    FriendCall(String),
}

impl HelpPayload {
    pub fn help_type(&self) -> HelpType {
        match self {
            HelpPayload::AudienceHelp(_) => HelpType::AudienceHelp,
            HelpPayload::FiftyFifty(_)   => HelpType::FiftyFifty,
            HelpPayload::FriendCall(_)   => HelpType::FriendCall,
        }
    }
}

/// One optional slot per help type. A slot is written at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_help: Option<AudienceVotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fifty_fifty: Option<[Letter; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friend_call: Option<String>,
}

impl HelpResults {
    pub fn is_used(&self, help: HelpType) -> bool {
        match help {
            HelpType::AudienceHelp => self.audience_help.is_some(),
            HelpType::FiftyFifty   => self.fifty_fifty.is_some(),
            HelpType::FriendCall   => self.friend_call.is_some(),
        }
    }

    pub fn get(&self, help: HelpType) -> Option<HelpPayload> {
        match help {
            HelpType::AudienceHelp => self.audience_help.clone().map(HelpPayload::AudienceHelp),
            HelpType::FiftyFifty   => self.fifty_fifty.map(HelpPayload::FiftyFifty),
            HelpType::FriendCall   => self.friend_call.clone().map(HelpPayload::FriendCall),
        }
    }

    /// Fill the slot for the payload's help type; an occupied slot is left as is.
    pub fn store(&mut self, payload: HelpPayload) -> GameResult<()> {
        let help = payload.help_type();
        if self.is_used(help) {
            return Err(GameError::HelpAlreadyUsed(help));
        }
        match payload {
            HelpPayload::AudienceHelp(votes) => self.audience_help = Some(votes),
            HelpPayload::FiftyFifty(pair)    => self.fifty_fifty = Some(pair),
            HelpPayload::FriendCall(text)    => self.friend_call = Some(text),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        HelpType::ALL.iter().all(|&h| !self.is_used(h))
    }
}

// ---------------------------------------------------------------------------
// Game question
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuestion {
    level: usize,
    question: Question,
    mapping: AnswerMapping,
    help: HelpResults,
}

impl GameQuestion {
    /// Bind `question` with a freshly shuffled answer mapping.
    pub fn new<R: Rng>(question: Question, rng: &mut R) -> Self {
        let mapping = AnswerMapping::shuffled(rng);
        Self::with_mapping(question, mapping)
    }

    pub fn with_mapping(question: Question, mapping: AnswerMapping) -> Self {
        GameQuestion {
            level: question.level,
            question,
            mapping,
            help: HelpResults::default(),
        }
    }

    pub(crate) fn restore(question: Question, mapping: AnswerMapping, help: HelpResults) -> Self {
        GameQuestion { level: question.level, question, mapping, help }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn question_id(&self) -> u64 {
        self.question.id
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn mapping(&self) -> AnswerMapping {
        self.mapping
    }

    /// Letter → answer text, regardless of help state.
    pub fn display_answers(&self) -> BTreeMap<Letter, String> {
        Letter::ALL
            .into_iter()
            .map(|l| {
                let text = self.question.answer(self.mapping.slot(l)).unwrap_or_default();
                (l, text.to_string())
            })
            .collect()
    }

    pub fn is_correct(&self, letter: Letter) -> bool {
        self.mapping.slot(letter) == self.question.correct_answer
    }

    pub fn correct_letter(&self) -> Letter {
        Letter::ALL
            .into_iter()
            .find(|&l| self.is_correct(l))
            .unwrap_or(Letter::A)
    }

    /// Letters a player can still pick: all four, or the fifty-fifty pair.
    pub fn visible_letters(&self) -> Vec<Letter> {
        match self.help.fifty_fifty {
            Some(pair) => pair.to_vec(),
            None => Letter::ALL.to_vec(),
        }
    }

    pub fn help_results(&self) -> &HelpResults {
        &self.help
    }

    pub fn help(&self, help: HelpType) -> Option<HelpPayload> {
        self.help.get(help)
    }

    pub fn audience_help(&self) -> Option<&AudienceVotes> {
        self.help.audience_help.as_ref()
    }

    pub fn fifty_fifty(&self) -> Option<[Letter; 2]> {
        self.help.fifty_fifty
    }

    pub fn friend_call(&self) -> Option<&str> {
        self.help.friend_call.as_deref()
    }

    pub(crate) fn store_help(&mut self, payload: HelpPayload) -> GameResult<()> {
        self.help.store(payload)
    }
}
