//! Engine configuration.
//!
//! Read from TOML; every key is optional and falls back to the reference game
//! (15 levels, fireproof at 4/9/14, 35 minute limit). Environment variables
//! override the file. `EngineConfig::rules` validates the result into the
//! [`GameRules`] every game is played under.
//!
//! ```toml
//! [game]
//! time_limit_secs = 2100
//! prizes = [100, 200, 300, 500, 1000]
//! fireproof_levels = [4]
//!
//! [help]
//! friend_call_accuracy = 0.9
//! friend_names = ["Alex", "Sam"]
//!
//! [engine]
//! rng_seed = 42
//! ```

use std::path::Path;

use chrono::Duration;
use serde::Deserialize;

use crate::game_engine::{
    errors::ConfigError,
    help::HelpEngine,
    prize_table::{PrizeTable, REFERENCE_FIREPROOF_LEVELS, REFERENCE_PRIZES},
};

pub const ENV_TIME_LIMIT_SECS: &str = "QUIZ_LADDER_TIME_LIMIT_SECS";
pub const ENV_RNG_SEED: &str = "QUIZ_LADDER_RNG_SEED";

// ── Public config ──

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub time_limit_secs: u64,
    pub prizes: Vec<u64>,
    pub fireproof_levels: Vec<usize>,
    pub friend_call_accuracy: f64,
    pub friend_names: Vec<String>,
    /// Fixed seed for question draws, shuffles and help outcomes.
    pub rng_seed: Option<u64>,
}

/// Validated rules a game is played under.
#[derive(Clone, Debug, PartialEq)]
pub struct GameRules {
    pub prize_table: PrizeTable,
    pub time_limit: Duration,
    pub help: HelpEngine,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            prize_table: PrizeTable::reference(),
            time_limit: Duration::seconds(default_time_limit() as i64),
            help: HelpEngine::default(),
        }
    }
}

// ── TOML schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    help: TomlHelp,
    #[serde(default)]
    engine: TomlEngine,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_time_limit")]
    time_limit_secs: u64,
    #[serde(default = "default_prizes")]
    prizes: Vec<u64>,
    #[serde(default = "default_fireproof")]
    fireproof_levels: Vec<usize>,
}

#[derive(Deserialize, Debug)]
struct TomlHelp {
    #[serde(default = "default_friend_accuracy")]
    friend_call_accuracy: f64,
    #[serde(default)]
    friend_names: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlEngine {
    #[serde(default)]
    rng_seed: Option<u64>,
}

// ── Defaults ──

fn default_time_limit() -> u64 { 35 * 60 }
fn default_prizes() -> Vec<u64> { REFERENCE_PRIZES.to_vec() }
fn default_fireproof() -> Vec<usize> { REFERENCE_FIREPROOF_LEVELS.to_vec() }
fn default_friend_accuracy() -> f64 { 0.9 }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            time_limit_secs: default_time_limit(),
            prizes: default_prizes(),
            fireproof_levels: default_fireproof(),
        }
    }
}

impl Default for TomlHelp {
    fn default() -> Self {
        TomlHelp {
            friend_call_accuracy: default_friend_accuracy(),
            friend_names: Vec::new(),
        }
    }
}

impl From<TomlConfig> for EngineConfig {
    fn from(t: TomlConfig) -> Self {
        EngineConfig {
            time_limit_secs: t.game.time_limit_secs,
            prizes: t.game.prizes,
            fireproof_levels: t.game.fireproof_levels,
            friend_call_accuracy: t.help.friend_call_accuracy,
            friend_names: t.help.friend_names,
            rng_seed: t.engine.rng_seed,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(text)?;
        Ok(parsed.into())
    }

    /// Load from a TOML file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Override fields from `lookup` (the process environment in `load`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_TIME_LIMIT_SECS) {
            self.time_limit_secs = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_TIME_LIMIT_SECS.to_string(),
                reason: format!("'{value}' is not a number of seconds"),
            })?;
        }
        if let Some(value) = lookup(ENV_RNG_SEED) {
            self.rng_seed = Some(value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_RNG_SEED.to_string(),
                reason: format!("'{value}' is not an unsigned integer"),
            })?);
        }
        Ok(())
    }

    /// Validate into the rules games are played under.
    pub fn rules(&self) -> Result<GameRules, ConfigError> {
        if self.time_limit_secs == 0 || self.time_limit_secs > i64::MAX as u64 / 1_000 {
            return Err(ConfigError::InvalidValue {
                field: "time_limit_secs".to_string(),
                reason: format!("{} is out of range", self.time_limit_secs),
            });
        }
        if !(0.0..=1.0).contains(&self.friend_call_accuracy) {
            return Err(ConfigError::InvalidValue {
                field: "friend_call_accuracy".to_string(),
                reason: format!("{} is not a probability", self.friend_call_accuracy),
            });
        }
        Ok(GameRules {
            prize_table: PrizeTable::new(self.prizes.clone(), self.fireproof_levels.clone())?,
            time_limit: Duration::seconds(self.time_limit_secs as i64),
            help: HelpEngine::new(self.friend_call_accuracy, self.friend_names.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_reference_game() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        let rules = config.rules().unwrap();
        assert_eq!(rules.prize_table, PrizeTable::reference());
        assert_eq!(rules.time_limit, Duration::minutes(35));
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [game]
            prizes = [10, 20, 30]
            fireproof_levels = [1]

            [engine]
            rng_seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.time_limit_secs, 2100);
        assert_eq!(config.rng_seed, Some(42));
        let rules = config.rules().unwrap();
        assert_eq!(rules.prize_table.levels(), 3);
        assert_eq!(rules.prize_table.fireproof_prize_below(2), 20);
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("[database]\nurl = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut config = EngineConfig::default();
        config.friend_call_accuracy = 1.5;
        assert!(matches!(config.rules(), Err(ConfigError::InvalidValue { .. })));

        let mut config = EngineConfig::default();
        config.time_limit_secs = 0;
        assert!(matches!(config.rules(), Err(ConfigError::InvalidValue { .. })));

        let mut config = EngineConfig::default();
        config.fireproof_levels = vec![15];
        assert!(matches!(config.rules(), Err(ConfigError::FireproofOutOfRange { .. })));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = EngineConfig::default();
        config
            .apply_overrides(|key| match key {
                ENV_TIME_LIMIT_SECS => Some("60".into()),
                ENV_RNG_SEED => Some(" 7 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.time_limit_secs, 60);
        assert_eq!(config.rng_seed, Some(7));

        let err = config
            .apply_overrides(|key| (key == ENV_RNG_SEED).then(|| "seven".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_RNG_SEED));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
