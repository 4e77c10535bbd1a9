//! Environment configuration.
//!
//! All settings come from environment variables (the binary loads `.env` first through
//! `dotenvy`). Only the Valkey URL and the contact email are required; everything else
//! falls back to production defaults.

use std::{str::FromStr, time::Duration};

use dioxus_logger::tracing::Level;

use crate::{
    battle::{DEFAULT_MAJOR_THRESHOLD, OVERLAP_THRESHOLD},
    error::{config::ConfigError, Error},
};

/// Default ESI base URL.
pub const DEFAULT_ESI_URL: &str = "https://esi.evetech.net/latest";
/// Default zKillboard RedisQ listen endpoint.
pub const DEFAULT_REDISQ_URL: &str = "https://redisq.zkillboard.com/listen.php";
/// Default number of RedisQ polls per fetch run.
pub const DEFAULT_FETCH_MAX: usize = 10;
/// Default age after which a quiet battle is expired (3 hours).
pub const DEFAULT_BATTLE_MAX_AGE_SECS: i64 = 10800;
/// Default store key prefix.
pub const DEFAULT_STORE_PREFIX: &str = "valkyrie";
/// Expiry of the advisory run locks.
pub const DEFAULT_LOCK_TTL_SECS: i64 = 120;
/// Delay between two RedisQ polls.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(50);

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `VALKEY_URL`
    pub valkey_url: String,
    /// `CONTACT_EMAIL`, included in the ESI user agent.
    pub contact_email: String,
    /// User agent sent with every upstream request.
    pub user_agent: String,
    /// `ESI_URL`
    pub esi_url: String,
    /// `REDISQ_URL`
    pub redisq_url: String,
    /// `ENGINE_ACTIVE`
    pub engine_active: bool,
    /// `FETCHER_ACTIVE`
    pub fetcher_active: bool,
    /// `FETCH_MAX`
    pub fetch_max: usize,
    /// `BATTLE_MAX_AGE_SECS`
    pub battle_max_age_secs: i64,
    /// `OVERLAP_THRESHOLD`, used for side merging.
    pub overlap_threshold: f64,
    /// `MAJOR_THRESHOLD`
    pub major_threshold: usize,
    /// `STORE_PREFIX`
    pub store_prefix: String,
    /// `LOG_LEVEL`
    pub log_level: Level,
}

/// Settings of one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Whether runs do anything at all.
    pub active: bool,
    /// Expiry of the processing lock.
    pub lock_ttl_secs: i64,
    /// Battles quiet for longer than this are expired.
    pub battle_max_age_secs: i64,
    /// Overlap at which two sides are merged.
    pub merge_threshold: f64,
    /// Minimum (exclusive) member count of both sides of a reported battle.
    pub major_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            active: true,
            lock_ttl_secs: DEFAULT_LOCK_TTL_SECS,
            battle_max_age_secs: DEFAULT_BATTLE_MAX_AGE_SECS,
            merge_threshold: OVERLAP_THRESHOLD,
            major_threshold: DEFAULT_MAJOR_THRESHOLD,
        }
    }
}

/// Settings of one fetcher instance.
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Whether runs do anything at all.
    pub active: bool,
    /// RedisQ listen endpoint.
    pub redisq_url: String,
    /// Maximum polls per run.
    pub fetch_max: usize,
    /// Expiry of the fetch lock.
    pub lock_ttl_secs: i64,
    /// Delay between polls.
    pub poll_delay: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            active: true,
            redisq_url: DEFAULT_REDISQ_URL.to_string(),
            fetch_max: DEFAULT_FETCH_MAX,
            lock_ttl_secs: DEFAULT_LOCK_TTL_SECS,
            poll_delay: DEFAULT_POLL_DELAY,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - All variables present and valid
    /// - `Err(Error::ConfigError)` - A required variable is missing or a value does not
    ///   parse
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, Error> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()).into())
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let contact_email = required("CONTACT_EMAIL")?;
        let user_agent = format!(
            "{}/{} ({}; +{})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            contact_email,
            env!("CARGO_PKG_REPOSITORY")
        );

        let overlap_threshold: f64 =
            parse_var("OVERLAP_THRESHOLD", &optional("OVERLAP_THRESHOLD", "0.1"))?;
        if !(0.0..=1.0).contains(&overlap_threshold) {
            return Err(ConfigError::InvalidEnvValue {
                var: "OVERLAP_THRESHOLD".to_string(),
                reason: format!("{} is not between 0 and 1", overlap_threshold),
            }
            .into());
        }

        Ok(Self {
            valkey_url: required("VALKEY_URL")?,
            contact_email,
            user_agent,
            esi_url: optional("ESI_URL", DEFAULT_ESI_URL),
            redisq_url: optional("REDISQ_URL", DEFAULT_REDISQ_URL),
            engine_active: parse_bool("ENGINE_ACTIVE", &optional("ENGINE_ACTIVE", "true"))?,
            fetcher_active: parse_bool("FETCHER_ACTIVE", &optional("FETCHER_ACTIVE", "true"))?,
            fetch_max: parse_var("FETCH_MAX", &optional("FETCH_MAX", "10"))?,
            battle_max_age_secs: parse_var(
                "BATTLE_MAX_AGE_SECS",
                &optional("BATTLE_MAX_AGE_SECS", "10800"),
            )?,
            overlap_threshold,
            major_threshold: parse_var("MAJOR_THRESHOLD", &optional("MAJOR_THRESHOLD", "2"))?,
            store_prefix: optional("STORE_PREFIX", DEFAULT_STORE_PREFIX),
            log_level: parse_var("LOG_LEVEL", &optional("LOG_LEVEL", "info"))?,
        })
    }

    /// Engine settings derived from this configuration.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            active: self.engine_active,
            battle_max_age_secs: self.battle_max_age_secs,
            merge_threshold: self.overlap_threshold,
            major_threshold: self.major_threshold,
            ..EngineConfig::default()
        }
    }

    /// Fetcher settings derived from this configuration.
    pub fn fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            active: self.fetcher_active,
            redisq_url: self.redisq_url.clone(),
            fetch_max: self.fetch_max,
            ..FetcherConfig::default()
        }
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvValue {
            var: var.to_string(),
            reason: format!("{:?} is not a boolean", other),
        }
        .into()),
    }
}
