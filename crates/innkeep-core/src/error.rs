//! # Error Types
//!
//! Domain-specific error types for innkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  innkeep-core errors (this file)                                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  innkeep-db errors (separate crate)                                    │
//! │  └── DbError          - InvalidRange / Conflict / NotFound / Timeout   │
//! │                         / Store                                        │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees (exit codes)            │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → CliError → terminal                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Stay range is empty or inverted (`start >= end`).
    ///
    /// ## User Workflow
    /// ```text
    /// Arrival 2024-01-05, Departure 2024-01-05
    ///      │
    ///      ▼
    /// DateRange::new() ← rejects
    ///      │
    ///      ▼
    /// InvalidRange { start: 2024-01-05, end: 2024-01-05 }
    ///      │
    ///      ▼
    /// Form shows: "departure must be after arrival"
    /// ```
    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Date falls outside years 0000 to 9999.
    #[error("Date {date} is outside the supported years 0000 to 9999")]
    DateOutOfRange { date: NaiveDate },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let err = ValidationError::InvalidRange {
            start: day,
            end: day,
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: start 2024-01-05 must be before end 2024-01-05"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "first_name".to_string(),
        };
        assert_eq!(err.to_string(), "first_name is required");

        let err = ValidationError::TooLong {
            field: "phone".to_string(),
            max: 32,
        };
        assert_eq!(err.to_string(), "phone must be at most 32 characters");
    }
}
