//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Process Startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings + query timeout         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Searches run in parallel on different connections.             │
//! │       │ Bookings queue on SQLite's single write lock.                   │
//! │       ▼                                                                 │
//! │  Database::close().await ← Process shutdown                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so that availability
//! searches never block on, and are never blocked by, a booking transaction.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult, StoreError};
use crate::migrations;
use crate::repository::availability::AvailabilityRepository;
use crate::repository::booking::BookingCoordinator;
use crate::repository::reservation::ReservationRepository;
use crate::repository::unit::UnitRepository;
use crate::repository::user::UserRepository;

/// Default upper bound for a single store call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

const MEMORY_PATH: &str = ":memory:";

/// Slack between the query timeout and SQLite's own busy wait.
const BUSY_MARGIN: Duration = Duration::from_secs(1);

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/innkeep.db")
///     .max_connections(10)
///     .query_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 10
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free pool connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection (`None` keeps it forever).
    /// Default: 5 minutes
    pub idle_timeout: Option<Duration>,

    /// How long a writer waits on SQLite's lock before giving up.
    /// Raised to just above `query_timeout` on connect, so a queued booking
    /// ends in `DbError::Timeout` rather than "database is locked".
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Upper bound for each repository call.
    /// Default: 3 seconds
    pub query_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(300)),
            busy_timeout: Duration::from_secs(5),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the SQLite busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets the per-call query timeout.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None, // Closing the only connection drops the data
            busy_timeout: Duration::from_secs(5),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    /// Busy wait actually handed to SQLite.
    pub fn effective_busy_timeout(&self) -> Duration {
        self.busy_timeout.max(self.query_timeout + BUSY_MARGIN)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let base = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
        };

        Ok(base
            // Readers don't block writers, writers don't block readers
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default for backwards compatibility
            .foreign_keys(true)
            .busy_timeout(self.effective_busy_timeout()))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Held by the caller for the life of the process and passed to whoever
/// needs the store. It is the SQLite variant of [`crate::Repository`].
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./innkeep.db")).await?;
/// let free = db.availability().free_units_for_range(start, end).await?;
/// db.close().await;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Upper bound for each repository call.
    query_timeout: Duration,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures WAL, NORMAL synchronous, foreign keys, busy timeout
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(if config.is_in_memory() {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::Store(StoreError::ConnectionFailed(e.to_string())))?;

        info!(
            max_connections = config.max_connections,
            query_timeout_ms = config.query_timeout.as_millis() as u64,
            "Database pool created"
        );

        let db = Database {
            pool,
            query_timeout: config.query_timeout,
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// For fixtures and diagnostics; callers should go through
    /// [`crate::Repository`].
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The per-call timeout applied by every repository.
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Returns the unit catalog.
    pub fn units(&self) -> UnitRepository {
        UnitRepository::new(self.pool.clone(), self.query_timeout)
    }

    /// Returns the availability index.
    pub fn availability(&self) -> AvailabilityRepository {
        AvailabilityRepository::new(self.pool.clone(), self.query_timeout)
    }

    /// Returns the booking transaction coordinator.
    pub fn bookings(&self) -> BookingCoordinator {
        BookingCoordinator::new(self.pool.clone(), self.query_timeout)
    }

    /// Returns the reservation store.
    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.pool.clone(), self.query_timeout)
    }

    /// Returns the staff account lookups.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone(), self.query_timeout)
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
