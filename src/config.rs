//! Environment-driven server configuration.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_SWEEP_SECS: u64 = 60;
const DEFAULT_INIT_DATA_MAX_AGE_SECS: u64 = 86_400;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Server configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Listen address.
    pub bind: SocketAddr,
    /// Telegram bot token used as the init-data HMAC key.
    pub bot_token: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Interval between reminder sweeps.
    pub reminder_sweep_interval: Duration,
    /// Oldest accepted `auth_date`; `None` disables the check.
    pub init_data_max_age: Option<Duration>,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("bind", &self.bind)
            .field("pool_size", &self.pool_size)
            .field("reminder_sweep_interval", &self.reminder_sweep_interval)
            .field("init_data_max_age", &self.init_data_max_age)
            .field("log_json", &self.log_json)
            .finish_non_exhaustive()
    }
}

impl TrackerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` or
    /// `TELEGRAM_BOT_TOKEN` is unset, and [`ConfigError::Invalid`] when any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// See [`TrackerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        let database_url = value("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let bot_token =
            value("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let bind: SocketAddr = parse_or(value("MINITRACKER_BIND"), "MINITRACKER_BIND", || {
            DEFAULT_BIND.parse()
        })?;
        let pool_size: u32 = parse_or(
            value("MINITRACKER_DB_POOL_SIZE"),
            "MINITRACKER_DB_POOL_SIZE",
            || Ok::<_, std::num::ParseIntError>(DEFAULT_POOL_SIZE),
        )?;
        let sweep_secs: u64 = parse_or(
            value("MINITRACKER_REMINDER_SWEEP_SECS"),
            "MINITRACKER_REMINDER_SWEEP_SECS",
            || Ok::<_, std::num::ParseIntError>(DEFAULT_SWEEP_SECS),
        )?;
        let max_age_secs: u64 = parse_or(
            value("MINITRACKER_INIT_DATA_MAX_AGE_SECS"),
            "MINITRACKER_INIT_DATA_MAX_AGE_SECS",
            || Ok::<_, std::num::ParseIntError>(DEFAULT_INIT_DATA_MAX_AGE_SECS),
        )?;
        let log_json = value("MINITRACKER_LOG_JSON")
            .map(|raw| parse_bool("MINITRACKER_LOG_JSON", &raw))
            .transpose()?
            .unwrap_or(false);

        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "MINITRACKER_DB_POOL_SIZE",
                value: pool_size.to_string(),
                reason: "pool size must be at least 1".to_owned(),
            });
        }
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "MINITRACKER_REMINDER_SWEEP_SECS",
                value: sweep_secs.to_string(),
                reason: "sweep interval must be at least 1 second".to_owned(),
            });
        }

        Ok(Self {
            database_url,
            bind,
            bot_token,
            pool_size,
            reminder_sweep_interval: Duration::from_secs(sweep_secs),
            init_data_max_age: (max_age_secs > 0).then(|| Duration::from_secs(max_age_secs)),
            log_json,
        })
    }
}

fn parse_or<T, E>(
    raw: Option<String>,
    name: &'static str,
    default: impl FnOnce() -> Result<T, E>,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    E: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: err.to_string(),
        }),
        None => default().map_err(|err| ConfigError::Invalid {
            name,
            value: String::new(),
            reason: err.to_string(),
        }),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_owned(),
            reason: "expected a boolean".to_owned(),
        }),
    }
}
