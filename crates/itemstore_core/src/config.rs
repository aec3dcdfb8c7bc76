//! Process configuration loaded from environment variables.
//!
//! # Responsibility
//! - Resolve the database target, bind address and logging settings.
//! - Reject malformed values at startup instead of at first request.
//!
//! # Variables
//! - `DATABASE_URL`: `sqlite://<path>`, `sqlite::memory:` or `memory://`
//!   (default `sqlite://app.db`).
//! - `BIND_ADDR`: socket address to listen on (default `0.0.0.0:5000`).
//! - `LOG_LEVEL`: `trace|debug|info|warn|error` (default `debug` in debug
//!   mode or debug builds, `info` otherwise).
//! - `LOG_DIR`: absolute directory for rolling log files; stdout when unset.
//! - `APP_DEBUG`: `true|1|t` enables debug mode: `debug` becomes the default
//!   log level and the resolved config is logged at startup.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://app.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Where records are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    SqliteFile(PathBuf),
    SqliteMemory,
    /// Process-local tables without SQLite.
    Memory,
}

impl DatabaseTarget {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim();
        match trimmed {
            "sqlite::memory:" | "sqlite://:memory:" => return Ok(Self::SqliteMemory),
            "memory" | "memory://" => return Ok(Self::Memory),
            _ => {}
        }

        match trimmed.strip_prefix("sqlite://") {
            Some(path) if !path.is_empty() => Ok(Self::SqliteFile(PathBuf::from(path))),
            _ => Err(ConfigError::InvalidDatabaseUrl(trimmed.to_string())),
        }
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseTarget,
    pub bind_addr: SocketAddr,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDatabaseUrl(String),
    InvalidBindAddr(String),
    InvalidLogLevel(String),
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDatabaseUrl(value) => write!(
                f,
                "invalid DATABASE_URL `{value}`; expected sqlite://<path>, sqlite::memory: or memory://"
            ),
            Self::InvalidBindAddr(value) => write!(f, "invalid BIND_ADDR `{value}`"),
            Self::InvalidLogLevel(message) | Self::InvalidLogDir(message) => {
                write!(f, "{message}")
            }
        }
    }
}

impl Error for ConfigError {}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let database = DatabaseTarget::parse(&database_url)?;

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;


        let log_dir = lookup("LOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| normalize_log_dir(&dir))
            .transpose()
            .map_err(ConfigError::InvalidLogDir)?;

        let debug = lookup("APP_DEBUG")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "t"))
            .unwrap_or(false);

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None if debug => "debug",
            None => default_log_level(),
        };

        Ok(Self {
            database,
            bind_addr,
            log_level,
            log_dir,
            debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, DatabaseTarget};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config.database,
            DatabaseTarget::SqliteFile(PathBuf::from("app.db"))
        );
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.log_dir.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn database_url_variants_are_recognized() {
        assert_eq!(
            DatabaseTarget::parse("sqlite::memory:").unwrap(),
            DatabaseTarget::SqliteMemory
        );
        assert_eq!(
            DatabaseTarget::parse("memory://").unwrap(),
            DatabaseTarget::Memory
        );
        assert_eq!(
            DatabaseTarget::parse("sqlite:///var/lib/app.db").unwrap(),
            DatabaseTarget::SqliteFile(PathBuf::from("/var/lib/app.db"))
        );
        assert!(matches!(
            DatabaseTarget::parse("postgres://localhost/app"),
            Err(ConfigError::InvalidDatabaseUrl(_))
        ));
        assert!(DatabaseTarget::parse("sqlite://").is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("DATABASE_URL", "memory://"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("LOG_LEVEL", "WARNING"),
            ("APP_DEBUG", "T"),
        ])
        .unwrap();
        assert_eq!(config.database, DatabaseTarget::Memory);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "warn");
        assert!(config.debug);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "not-an-addr")]),
            Err(ConfigError::InvalidBindAddr(_))
        ));
        assert!(matches!(
            config_from(&[("LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            config_from(&[("LOG_DIR", "relative/logs")]),
            Err(ConfigError::InvalidLogDir(_))
        ));
    }

    #[test]
    fn debug_mode_raises_default_level_but_not_an_explicit_one() {
        let config = config_from(&[("APP_DEBUG", "true")]).unwrap();
        assert_eq!(config.log_level, "debug");

        let config = config_from(&[("APP_DEBUG", "1"), ("LOG_LEVEL", "error")]).unwrap();
        assert_eq!(config.log_level, "error");
        assert!(config.debug);
    }
}
