use std::path::PathBuf;

use chrono_tz::Tz;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid DISPLAY_TIMEZONE {0:?}")]
    InvalidTimezone(String),
}

/// Settings read from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// `CONCERTS_TABLE`. Optional only when a seed file is given.
    pub concerts_table: Option<String>,
    /// `DISPLAY_TIMEZONE`, defaults to UTC.
    pub display_timezone: Tz,
    /// `BIND_ADDR`, used by the local server.
    pub bind_addr: String,
    /// `CONCERTS_SEED_FILE`, serves concerts from a JSON file instead of DynamoDB.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let display_timezone = match get("DISPLAY_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            None => Tz::UTC,
        };

        Ok(Self {
            concerts_table: get("CONCERTS_TABLE"),
            display_timezone,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            seed_file: get("CONCERTS_SEED_FILE").map(PathBuf::from),
        })
    }

    pub fn require_concerts_table(&self) -> Result<&str, ConfigError> {
        self.concerts_table
            .as_deref()
            .ok_or(ConfigError::Missing("CONCERTS_TABLE"))
    }
}
