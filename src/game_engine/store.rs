//! Persistence boundary for games.
//!
//! The store owns the two guarantees that need more than one game in view:
//! serialized updates per game, and at most one unfinished game per player.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;

use crate::game_engine::{
    errors::{GameError, GameResult},
    game::Game,
    models::{GameId, PlayerId},
};

pub trait GameStore: Send + Sync {
    /// The player's unfinished game, if any.
    fn find_active_game(&self, player_id: PlayerId) -> Option<GameId>;

    /// Insert a new game. Fails with `ActiveGameExists` if the player already
    /// has an unfinished game; nothing is written in that case.
    fn insert(&self, game: Game) -> GameResult<GameId>;

    /// A snapshot of the game.
    fn load(&self, id: GameId) -> GameResult<Game>;

    /// Run `f` on the game under its exclusive lock. The change is committed
    /// only if `f` returns `Ok`.
    fn update<T, F>(&self, id: GameId, f: F) -> GameResult<T>
    where
        F: FnOnce(&mut Game) -> GameResult<T>;

    /// Every game of a player, newest first.
    fn games_for_player(&self, player_id: PlayerId) -> Vec<Game>;
}

/// Games kept in memory, each behind its own lock.
///
/// Lock order is game lock, then the active-game index; `insert` only takes
/// the index lock.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: DashMap<GameId, Arc<Mutex<Game>>>,
    active: Mutex<HashMap<PlayerId, GameId>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn slot(&self, id: GameId) -> GameResult<Arc<Mutex<Game>>> {
        self.games
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(GameError::GameNotFound(id))
    }

    fn active_index(&self) -> MutexGuard<'_, HashMap<PlayerId, GameId>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn lock_game(slot: &Mutex<Game>) -> MutexGuard<'_, Game> {
    // `update` only ever writes back whole games, so a poisoned slot is consistent.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl GameStore for InMemoryGameStore {
    fn find_active_game(&self, player_id: PlayerId) -> Option<GameId> {
        self.active_index().get(&player_id).copied()
    }

    fn insert(&self, game: Game) -> GameResult<GameId> {
        let id = game.id();
        let player_id = game.player_id();
        let mut active = self.active_index();

        if !game.is_finished() && active.contains_key(&player_id) {
            return Err(GameError::ActiveGameExists { player_id });
        }
        if self.games.contains_key(&id) {
            return Err(GameError::CorruptRecord(format!("game {id} already stored")));
        }

        if !game.is_finished() {
            active.insert(player_id, id);
        }
        self.games.insert(id, Arc::new(Mutex::new(game)));
        tracing::debug!(game_id = %id, player_id = %player_id, "stored game");
        Ok(id)
    }

    fn load(&self, id: GameId) -> GameResult<Game> {
        let slot = self.slot(id)?;
        let game = lock_game(&slot).clone();
        Ok(game)
    }

    fn update<T, F>(&self, id: GameId, f: F) -> GameResult<T>
    where
        F: FnOnce(&mut Game) -> GameResult<T>,
    {
        let slot = self.slot(id)?;
        let mut guard = lock_game(&slot);

        let mut working = guard.clone();
        let value = f(&mut working)?;
        let finished = working.is_finished();
        let player_id = working.player_id();
        *guard = working;

        if finished {
            let mut active = self.active_index();
            if active.get(&player_id) == Some(&id) {
                active.remove(&player_id);
            }
        }
        Ok(value)
    }

    fn games_for_player(&self, player_id: PlayerId) -> Vec<Game> {
        let slots: Vec<Arc<Mutex<Game>>> = self
            .games
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut games: Vec<Game> = slots
            .iter()
            .map(|slot| lock_game(slot))
            .filter(|g| g.player_id() == player_id)
            .map(|g| g.clone())
            .collect();
        games.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        games
    }
}
