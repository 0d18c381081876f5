//! Synchronous facade the host application drives the engine through.
//!
//! `GameService` ties the factory, store, account service, clock and RNG
//! together. Every mutating call runs under the game's lock in the store; game
//! creation is additionally serialized per player. Credits are requested after
//! the transition has been committed and a failed credit is only logged.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game_engine::{
    accounts::AccountService,
    bank::QuestionBank,
    config::{EngineConfig, GameRules},
    errors::{ConfigError, GameResult},
    factory::GameFactory,
    game::Game,
    game_question::HelpPayload,
    models::{CreditIntent, GameId, HelpType, Letter, PlayerId, TurnOutcome},
    store::GameStore,
};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock { now: Mutex::new(start) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

pub struct GameService<B, S, A, C = SystemClock> {
    factory: GameFactory,
    bank: B,
    store: S,
    accounts: A,
    clock: C,
    rng: Mutex<StdRng>,
    player_locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl<B, S, A, C> GameService<B, S, A, C>
where
    B: QuestionBank,
    S: GameStore,
    A: AccountService,
    C: Clock,
{
    /// `rng_seed: None` seeds from entropy.
    pub fn new(rules: GameRules, rng_seed: Option<u64>, bank: B, store: S, accounts: A, clock: C) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        GameService {
            factory: GameFactory::new(Arc::new(rules)),
            bank,
            store,
            accounts,
            clock,
            rng: Mutex::new(rng),
            player_locks: DashMap::new(),
        }
    }

    pub fn from_config(config: &EngineConfig, bank: B, store: S, accounts: A, clock: C) -> Result<Self, ConfigError> {
        Ok(Self::new(config.rules()?, config.rng_seed, bank, store, accounts, clock))
    }

    pub fn rules(&self) -> &GameRules {
        self.factory.rules()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    /// Start a game for `player_id`.
    pub fn create_game(&self, player_id: PlayerId) -> GameResult<Game> {
        let lock = self
            .player_locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _creating = lock.lock().unwrap_or_else(|p| p.into_inner());

        let now = self.clock.now();
        let mut rng = self.rng();
        self.factory
            .create_for_player(player_id, &self.bank, &self.store, &mut *rng, now)
            .map_err(|e| {
                tracing::debug!(player_id = %player_id, error = %e, "game creation refused");
                e
            })
    }

    pub fn game(&self, id: GameId) -> GameResult<Game> {
        self.store.load(id)
    }

    pub fn active_game(&self, player_id: PlayerId) -> Option<GameId> {
        self.store.find_active_game(player_id)
    }

    pub fn games_for_player(&self, player_id: PlayerId) -> Vec<Game> {
        self.store.games_for_player(player_id)
    }

    pub fn answer(&self, id: GameId, letter: Letter) -> GameResult<TurnOutcome> {
        let outcome = self.store.update(id, |game| game.answer(letter, self.clock.now()))?;
        tracing::debug!(
            game_id = %id,
            %letter,
            correct = ?outcome.correct,
            level = outcome.level,
            "answer submitted"
        );
        self.settle(id, &outcome);
        Ok(outcome)
    }

    pub fn take_money(&self, id: GameId) -> GameResult<TurnOutcome> {
        let outcome = self.store.update(id, |game| game.take_money(self.clock.now()))?;
        self.settle(id, &outcome);
        Ok(outcome)
    }

    pub fn use_help(&self, id: GameId, help: HelpType) -> GameResult<HelpPayload> {
        let payload = self.store.update(id, |game| {
            let mut rng = self.rng();
            game.use_help(help, &mut *rng)
        })?;
        tracing::debug!(game_id = %id, %help, "help used");
        Ok(payload)
    }

    /// Finish the game as timed out if its time limit has passed.
    pub fn time_out(&self, id: GameId) -> GameResult<Option<TurnOutcome>> {
        let outcome = self.store.update(id, |game| Ok(game.time_out(self.clock.now())))?;
        if let Some(outcome) = &outcome {
            self.settle(id, outcome);
        }
        Ok(outcome)
    }

    fn settle(&self, id: GameId, outcome: &TurnOutcome) {
        if outcome.status.is_terminal() {
            tracing::info!(game_id = %id, status = %outcome.status, prize = outcome.prize, "game finished");
        }
        if let Some(credit) = outcome.credit {
            self.credit(credit);
        }
    }

    fn credit(&self, intent: CreditIntent) {
        match self.accounts.credit(intent.player_id, intent.amount) {
            Ok(()) => tracing::debug!(
                player_id = %intent.player_id,
                game_id = %intent.game_id,
                amount = intent.amount,
                "prize credited"
            ),
            Err(e) => tracing::warn!(
                player_id = %intent.player_id,
                game_id = %intent.game_id,
                amount = intent.amount,
                error = %e,
                "prize credit failed"
            ),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|p| p.into_inner())
    }
}
