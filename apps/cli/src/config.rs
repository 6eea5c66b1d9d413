//! CLI configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults; global command-line flags override both.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use innkeep_db::{DbConfig, DEFAULT_QUERY_TIMEOUT};

use crate::cli::Cli;

/// Runtime configuration for the `innkeep` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Upper bound for every store call
    pub query_timeout: Duration,

    /// Pool size
    pub max_connections: u32,

    /// Capacity of the outgoing mail queue
    pub mail_queue: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(AppConfig {
            db_path: match env::var("INNKEEP_DB_PATH") {
                Ok(path) => PathBuf::from(path),
                Err(_) => default_db_path(),
            },

            query_timeout: Duration::from_secs(parse_var(
                "INNKEEP_QUERY_TIMEOUT_SECS",
                DEFAULT_QUERY_TIMEOUT.as_secs(),
            )?),

            max_connections: parse_var("INNKEEP_MAX_CONNECTIONS", 10)?,

            mail_queue: parse_var("INNKEEP_MAIL_QUEUE", 100)?,
        })
    }

    /// Applies global flags on top of the loaded values.
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(path) = &cli.db {
            self.db_path = path.clone();
        }
        if let Some(secs) = cli.query_timeout {
            self.query_timeout = Duration::from_secs(secs);
        }
        if self.query_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("query timeout".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("INNKEEP_MAX_CONNECTIONS".to_string()));
        }
        if self.mail_queue == 0 {
            return Err(ConfigError::InvalidValue("INNKEEP_MAIL_QUEUE".to_string()));
        }
        Ok(self)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
            .max_connections(self.max_connections)
            .query_timeout(self.query_timeout)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Platform data directory, or the working directory if none can be found.
///
/// - **macOS**: `~/Library/Application Support/com.innkeep.innkeep/innkeep.db`
/// - **Linux**: `~/.local/share/innkeep/innkeep.db`
fn default_db_path() -> PathBuf {
    ProjectDirs::from("com", "innkeep", "innkeep")
        .map(|dirs| dirs.data_dir().join("innkeep.db"))
        .unwrap_or_else(|| PathBuf::from("innkeep.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Creates the parent directory of the database file if needed.
pub fn ensure_parent_dir(config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn base() -> AppConfig {
        AppConfig {
            db_path: PathBuf::from("env.db"),
            query_timeout: Duration::from_secs(3),
            max_connections: 10,
            mail_queue: 100,
        }
    }

    #[test]
    fn test_flags_override_loaded_values() {
        let cli = Cli::parse_from(["innkeep", "--db", "flag.db", "--query-timeout", "9", "units"]);
        let config = base().with_overrides(&cli).unwrap();

        assert_eq!(config.db_path, PathBuf::from("flag.db"));
        assert_eq!(config.query_timeout, Duration::from_secs(9));
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::parse_from(["innkeep", "--query-timeout", "0", "units"]);
        assert!(matches!(
            base().with_overrides(&cli),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base();
        config.db_path = dir.path().join("a").join("b").join("innkeep.db");

        ensure_parent_dir(&config).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
