//! Crediting finalized prizes to player accounts.
//!
//! The engine only *requests* a credit; the account service owns balances.
//! A failed credit never rolls back the game transition that produced it.

use dashmap::DashMap;

use crate::game_engine::models::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("account service unavailable: {0}")]
    Unavailable(String),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

pub trait AccountService: Send + Sync {
    fn credit(&self, player_id: PlayerId, amount: u64) -> Result<(), AccountError>;
}

/// Balances kept in memory; every player starts at zero.
#[derive(Debug, Default)]
pub struct InMemoryAccounts {
    balances: DashMap<PlayerId, u64>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, player_id: PlayerId) -> u64 {
        self.balances.get(&player_id).map(|b| *b).unwrap_or(0)
    }
}

impl AccountService for InMemoryAccounts {
    fn credit(&self, player_id: PlayerId, amount: u64) -> Result<(), AccountError> {
        let mut balance = self.balances.entry(player_id).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_accumulate_per_player() {
        let accounts = InMemoryAccounts::new();
        accounts.credit(PlayerId(1), 1_000).unwrap();
        accounts.credit(PlayerId(1), 500).unwrap();
        accounts.credit(PlayerId(2), 100).unwrap();
        assert_eq!(accounts.balance(PlayerId(1)), 1_500);
        assert_eq!(accounts.balance(PlayerId(2)), 100);
        assert_eq!(accounts.balance(PlayerId(3)), 0);
    }
}
