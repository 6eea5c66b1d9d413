//! # innkeep-core: Pure Domain Logic for Innkeep
//!
//! Domain types and validation for the availability & booking engine,
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innkeep Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Callers (CLI, web)                           │   │
//! │  │    search ──► book ──► list ──► process                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Repository trait                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    innkeep-db (store + booking)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ innkeep-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   error   │  │ validation│                  │   │
//! │  │   │ DateRange │  │ Validation│  │  guest    │                  │   │
//! │  │   │ Unit, ... │  │   Error   │  │  fields   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Unit, Reservation, Restriction, DateRange)
//! - [`error`] - Validation error types
//! - [`validation`] - Guest field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use innkeep_core::DateRange;
//!
//! let arrive = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let depart = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//!
//! let stay = DateRange::new(arrive, depart).unwrap();
//! assert_eq!(stay.nights(), 4);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a guest first or last name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum length of a phone number as typed.
pub const MAX_PHONE_LEN: usize = 32;
