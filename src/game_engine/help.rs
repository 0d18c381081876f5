//! The three help types.
//!
//! Every function here is pure given the RNG. The once-per-game limit is
//! enforced by [`Game`](crate::game_engine::game::Game), not here.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_engine::{
    game_question::{AudienceVotes, HelpPayload},
    models::{HelpType, Letter},
};

/// Bounds of the correct letter's initial audience share, in percent.
const AUDIENCE_CORRECT_MIN: u8 = 40;
const AUDIENCE_CORRECT_MAX: u8 = 85;

const DEFAULT_FRIENDS: [&str; 5] = ["Alex", "Sam", "Robin", "Jordan", "Casey"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpEngine {
    /// Probability that the friend names the correct letter.
    friend_call_accuracy: f64,
    friend_names: Vec<String>,
}

impl Default for HelpEngine {
    fn default() -> Self {
        HelpEngine {
            friend_call_accuracy: 0.9,
            friend_names: DEFAULT_FRIENDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HelpEngine {
    /// `friend_call_accuracy` is clamped to `0.0..=1.0`; an empty name list
    /// falls back to the built-in friends.
    pub fn new(friend_call_accuracy: f64, friend_names: Vec<String>) -> Self {
        let friend_names = if friend_names.is_empty() {
            DEFAULT_FRIENDS.iter().map(|s| s.to_string()).collect()
        } else {
            friend_names
        };
        HelpEngine {
            friend_call_accuracy: friend_call_accuracy.clamp(0.0, 1.0),
            friend_names,
        }
    }

    pub fn friend_call_accuracy(&self) -> f64 {
        self.friend_call_accuracy
    }

    pub fn compute<R: Rng>(&self, help: HelpType, correct: Letter, rng: &mut R) -> HelpPayload {
        match help {
            HelpType::AudienceHelp => HelpPayload::AudienceHelp(audience_help(correct, rng)),
            HelpType::FiftyFifty   => HelpPayload::FiftyFifty(fifty_fifty(correct, rng)),
            HelpType::FriendCall   => HelpPayload::FriendCall(self.friend_call(correct, rng)),
        }
    }

    /// A sentence from a friend naming one letter: usually the correct one.
    pub fn friend_call<R: Rng>(&self, correct: Letter, rng: &mut R) -> String {
        let letter = if rng.gen_bool(self.friend_call_accuracy) {
            correct
        } else {
            let wrong = wrong_letters(correct);
            wrong.choose(rng).copied().unwrap_or(correct)
        };
        let name = self
            .friend_names
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(DEFAULT_FRIENDS[0]);
        format!("{name} thinks the answer is {}", letter.label())
    }
}

fn wrong_letters(correct: Letter) -> Vec<Letter> {
    Letter::ALL.into_iter().filter(|&l| l != correct).collect()
}

/// Audience vote: four shares summing to 100, the correct letter's the largest.
pub fn audience_help<R: Rng>(correct: Letter, rng: &mut R) -> AudienceVotes {
    let correct_share = rng.gen_range(AUDIENCE_CORRECT_MIN..=AUDIENCE_CORRECT_MAX);
    let rest = 100 - correct_share;

    // Two cut points split the remainder into three parts.
    let mut cuts = [rng.gen_range(0..=rest), rng.gen_range(0..=rest)];
    cuts.sort_unstable();
    let mut shares = [correct_share, cuts[0], cuts[1] - cuts[0], rest - cuts[1]];

    // Keep the correct letter on top.
    let top = (1..shares.len()).fold(0, |best, i| if shares[i] > shares[best] { i } else { best });
    shares.swap(0, top);

    let mut votes = AudienceVotes::new();
    votes.insert(correct, shares[0]);
    for (letter, share) in wrong_letters(correct).into_iter().zip(&shares[1..]) {
        votes.insert(letter, *share);
    }
    votes
}

/// The correct letter plus one random wrong letter, in letter order.
pub fn fifty_fifty<R: Rng>(correct: Letter, rng: &mut R) -> [Letter; 2] {
    let wrong = wrong_letters(correct);
    let other = wrong[rng.gen_range(0..wrong.len())];
    if other < correct {
        [other, correct]
    } else {
        [correct, other]
    }
}
