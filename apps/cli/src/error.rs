//! # CLI Error Type
//!
//! Maps store errors to operator messages and process exit codes.
//!
//! ```text
//! DbError::InvalidRange / Invalid ──► CliError::Invalid      exit 2
//! DbError::Conflict               ──► CliError::Unavailable  exit 3
//! DbError::NotFound               ──► CliError::NotFound     exit 4
//! DbError::Timeout / Store        ──► CliError::Store        exit 1
//! ```

use std::io;

use chrono::NaiveDate;
use innkeep_core::ValidationError;
use innkeep_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors reported by the `innkeep` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad configuration or arguments.
    #[error("{0}")]
    Invalid(String),

    /// The dates were taken before the booking committed.
    #[error("Sorry, unit {unit_id} is no longer available from {start} to {end} (dates no longer available)")]
    Unavailable {
        unit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("{0}")]
    NotFound(String),

    /// Timeout or storage failure.
    #[error("{0}")]
    Store(DbError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot write output: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code.
    ///
    /// - 1: timeout, storage or output failure
    /// - 2: invalid input or configuration
    /// - 3: dates unavailable
    /// - 4: not found
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Invalid(_) | CliError::Config(_) => 2,
            CliError::Unavailable { .. } => 3,
            CliError::NotFound(_) => 4,
            CliError::Store(_) | CliError::Io(_) | CliError::Json(_) => 1,
        }
    }
}

impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidRange { .. } | DbError::Invalid(_) => CliError::Invalid(err.to_string()),
            DbError::Conflict {
                unit_id,
                start,
                end,
            } => CliError::Unavailable {
                unit_id,
                start,
                end,
            },
            DbError::NotFound { .. } => CliError::NotFound(err.to_string()),
            DbError::Timeout { .. } | DbError::Store(_) => CliError::Store(err),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Invalid(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use innkeep_db::StoreError;

    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_exit_codes() {
        let conflict: CliError = DbError::Conflict {
            unit_id: 1,
            start: jan(1),
            end: jan(5),
        }
        .into();
        assert_eq!(conflict.exit_code(), 3);
        assert!(conflict.to_string().contains("dates no longer available"));

        let invalid: CliError = DbError::from(ValidationError::InvalidRange {
            start: jan(5),
            end: jan(5),
        })
        .into();
        assert_eq!(invalid.exit_code(), 2);

        let missing: CliError = DbError::not_found("Reservation", 9).into();
        assert_eq!(missing.exit_code(), 4);

        let timeout: CliError = DbError::Timeout {
            operation: "create_reservation",
            limit: Duration::from_secs(3),
        }
        .into();
        assert_eq!(timeout.exit_code(), 1);

        let store: CliError = DbError::Store(StoreError::PoolExhausted).into();
        assert_eq!(store.exit_code(), 1);
    }
}
