//! # Database Error Types
//!
//! Error taxonomy for store and booking operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (innkeep-core)  ──► DbError::InvalidRange / Invalid   │
//! │                                                                         │
//! │  Overlap found in transaction     ──► DbError::Conflict                │
//! │                                                                         │
//! │  Lookup miss / 0 rows affected    ──► DbError::NotFound                │
//! │                                                                         │
//! │  tokio::time::timeout elapsed     ──► DbError::Timeout                 │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)       ──► DbError::Store(StoreError)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← Exit code + operator message                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried automatically. A `Conflict` or `Timeout` goes
//! back to the caller, which may re-check availability and try again.

use std::time::Duration;

use chrono::NaiveDate;
use innkeep_core::ValidationError;
use thiserror::Error;

/// Errors surfaced by the Repository contract.
#[derive(Debug, Error)]
pub enum DbError {
    /// Stay range is empty or inverted.
    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Any other input that failed validation before reaching the store.
    #[error("Invalid input: {0}")]
    Invalid(ValidationError),

    /// Unit already has an overlapping restriction at commit time.
    ///
    /// ## When This Occurs
    /// - Another booking committed between the guest's search and submit
    /// - An owner block covers part of the requested stay
    #[error("Unit {unit_id} is not available from {start} to {end}")]
    Conflict {
        unit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A store operation exceeded its time bound and was cancelled.
    #[error("{operation} timed out after {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    /// Any other data-access failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether the caller should re-run the availability search.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict { .. })
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidRange { start, end } => DbError::InvalidRange { start, end },
            other => DbError::Invalid(other),
        }
    }
}

/// Underlying data-access failures, wrapped for diagnostics.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent unit_id
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Runtime SQL error.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Row scan mismatch (wrong column count or type).
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound         → DbError::NotFound
/// sqlx::Error::Database            → Analyze message for constraint type
/// sqlx::Error::ColumnDecode / ...  → StoreError::Decode
/// sqlx::Error::PoolTimedOut        → StoreError::PoolExhausted
/// Other                            → StoreError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let store = match err {
            sqlx::Error::RowNotFound => return DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    StoreError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => StoreError::Decode(err.to_string()),

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        };
        DbError::Store(store)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Store(StoreError::MigrationFailed(err.to_string()))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
