//! # innkeep-db: Availability & Booking Engine for Innkeep
//!
//! This crate owns everything that touches reservation storage: the unit
//! catalog, the availability index, the booking transaction and staff-side
//! reservation management. It uses SQLite via sqlx for the durable variant
//! and an in-memory variant for tests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innkeep Data Flow                                │
//! │                                                                         │
//! │  CLI command (search / book / list ...)                                │
//! │       │  &dyn Repository                                                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     innkeep-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ UnitRepo       │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ Availability   │    │              │  │   │
//! │  │   │ query timeout │    │ Booking (tx)   │    │              │  │   │
//! │  │   │               │    │ ReservationRepo│    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   MemoryRepository ── same contract, tokio Mutex state          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`contract`] - The [`Repository`] trait every caller depends on
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Error taxonomy (validation, conflict, not found, timeout, store)
//! - [`repository`] - SQLite repositories behind [`Database`]
//! - [`memory`] - In-memory [`Repository`] variant
//!
//! ## Usage
//!
//! ```rust,ignore
//! use innkeep_db::{Database, DbConfig, Repository};
//!
//! let db = Database::new(DbConfig::new("./innkeep.db")).await?;
//! let repo: &dyn Repository = &db;
//!
//! let free = repo.free_units_for_range(start, end).await?;
//! let id = repo.create_reservation(&new_reservation).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod contract;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use contract::Repository;
pub use error::{DbError, DbResult, StoreError};
pub use memory::MemoryRepository;
pub use pool::{Database, DbConfig, DEFAULT_QUERY_TIMEOUT};

// Repository re-exports for convenience
pub use repository::availability::AvailabilityRepository;
pub use repository::booking::BookingCoordinator;
pub use repository::reservation::ReservationRepository;
pub use repository::unit::UnitRepository;
pub use repository::user::UserRepository;
