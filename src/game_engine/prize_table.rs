use serde::{Deserialize, Serialize};

use crate::game_engine::errors::ConfigError;

/// Prize per level of the reference ladder.
pub const REFERENCE_PRIZES: [u64; 15] = [
    100, 200, 300, 500, 1_000,
    2_000, 4_000, 8_000, 16_000, 32_000,
    64_000, 125_000, 250_000, 500_000, 1_000_000,
];

/// Levels whose prize survives a later loss in the reference ladder.
pub const REFERENCE_FIREPROOF_LEVELS: [usize; 3] = [4, 9, 14];

/// Guaranteed prize per level plus the fireproof milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTable {
    prizes: Vec<u64>,
    fireproof: Vec<usize>,
}

impl PrizeTable {
    pub fn new(prizes: Vec<u64>, mut fireproof: Vec<usize>) -> Result<Self, ConfigError> {
        if prizes.is_empty() {
            return Err(ConfigError::EmptyPrizeTable);
        }
        for (level, pair) in prizes.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(ConfigError::DecreasingPrize { level: level + 1, prize: pair[1] });
            }
        }
        if let Some(&level) = fireproof.iter().find(|&&l| l >= prizes.len()) {
            return Err(ConfigError::FireproofOutOfRange { level, levels: prizes.len() });
        }
        fireproof.sort_unstable();
        fireproof.dedup();
        Ok(PrizeTable { prizes, fireproof })
    }

    pub fn reference() -> Self {
        PrizeTable {
            prizes: REFERENCE_PRIZES.to_vec(),
            fireproof: REFERENCE_FIREPROOF_LEVELS.to_vec(),
        }
    }

    /// Number of levels in a game.
    pub fn levels(&self) -> usize {
        self.prizes.len()
    }

    pub fn max_level(&self) -> usize {
        self.prizes.len() - 1
    }

    /// Prize guaranteed once `level` has been answered correctly.
    pub fn prize_for(&self, level: usize) -> u64 {
        self.prizes.get(level).copied().unwrap_or(0)
    }

    pub fn top_prize(&self) -> u64 {
        self.prizes[self.max_level()]
    }

    pub fn is_fireproof(&self, level: usize) -> bool {
        self.fireproof.binary_search(&level).is_ok()
    }

    pub fn fireproof_levels(&self) -> &[usize] {
        &self.fireproof
    }

    /// Prize kept on a loss at `current_level`: the prize of the highest
    /// fireproof level strictly below it, or 0.
    pub fn fireproof_prize_below(&self, current_level: usize) -> u64 {
        self.fireproof
            .iter()
            .rev()
            .find(|&&l| l < current_level)
            .map(|&l| self.prize_for(l))
            .unwrap_or(0)
    }

    pub fn prizes(&self) -> &[u64] {
        &self.prizes
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::reference()
    }
}
