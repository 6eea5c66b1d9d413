//! # Domain Types
//!
//! Core domain types used throughout Innkeep.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Unit       │   │   Reservation   │   │   Restriction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  unit_id (FK)   │◄──│  reservation_id │       │
//! │  │  name           │   │  guest fields   │   │  unit_id (FK)   │       │
//! │  │                 │   │  start..end     │   │  start..end     │       │
//! │  └─────────────────┘   │  processed      │   │  kind           │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   DateRange     │   │ NewReservation  │   │ RestrictionKind │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  [start, end)   │   │  guest fields   │   │  Reservation    │       │
//! │  │  start < end    │   │  unit + stay    │   │  OwnerBlock     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Half-Open Stays
//! Every stay is `[start, end)`: the departure day is free for the next
//! guest, so back-to-back bookings never collide.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{self, ValidationResult};

// =============================================================================
// Date Range
// =============================================================================

/// Years whose ISO form is exactly `YYYY-MM-DD`. Stored dates compare as
/// text, which only matches calendar order inside this span.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// A non-empty half-open date interval `[start, end)`.
///
/// The only way to build one is [`DateRange::new`], so holding a `DateRange`
/// means `start < end` already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start >= end` and years outside
    /// [`STORABLE_YEARS`].
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use innkeep_core::DateRange;
    ///
    /// let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    /// assert!(DateRange::new(jan(1), jan(5)).is_ok());
    /// assert!(DateRange::new(jan(5), jan(5)).is_err());
    /// ```
    pub fn new(start: NaiveDate, end: NaiveDate) -> ValidationResult<Self> {
        for date in [start, end] {
            if !STORABLE_YEARS.contains(&date.year()) {
                return Err(ValidationError::DateOutOfRange { date });
            }
        }
        if start >= end {
            return Err(ValidationError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    /// First night of the stay (inclusive).
    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Departure day (exclusive).
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights covered.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Strict overlap test: touching boundaries do not overlap.
    ///
    /// ```text
    /// [01 ──── 05)
    ///          [05 ──── 10)     → no overlap
    ///      [03 ──── 06)         → overlap
    /// ```
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && self.end > start
    }
}

// =============================================================================
// Unit
// =============================================================================

/// A bookable lodging unit (room).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Unit {
    /// Stable integer identifier.
    pub id: i64,

    /// Display name shown to guests.
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Denormalized unit snapshot embedded in a [`Reservation`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitRef {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Reservation
// =============================================================================

/// A persisted guest reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,

    /// Arrival (inclusive).
    pub start_date: NaiveDate,

    /// Departure (exclusive).
    pub end_date: NaiveDate,

    pub unit_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Whether staff has handled this reservation. New ones start unprocessed.
    pub processed: bool,

    /// Unit snapshot, populated on read.
    pub unit: UnitRef,
}

impl Reservation {
    /// Guest display name ("First Last").
    pub fn guest_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Guest-entered data for a new reservation.
///
/// ## Flow
/// ```text
/// Form input ──► NewReservation::validate() ──► create_reservation()
///                      │
///                      └── names / email / phone checks
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReservation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub unit_id: i64,
    pub stay: DateRange,
}

impl NewReservation {
    /// Checks the guest-editable fields.
    ///
    /// The stay itself is already valid by construction.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_guest(&self.first_name, &self.last_name, &self.email, &self.phone)
    }
}

// =============================================================================
// Restriction
// =============================================================================

/// Why a unit is blocked for an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i64)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Created together with a reservation.
    Reservation = 1,
    /// Independent block (owner stay, maintenance).
    OwnerBlock = 2,
}

impl RestrictionKind {
    /// Row id in the `restriction_kinds` reference table.
    #[inline]
    pub const fn id(self) -> i64 {
        self as i64
    }
}

/// A blocked interval on a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Restriction {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub unit_id: i64,

    /// Set when the restriction belongs to a reservation.
    pub reservation_id: Option<i64>,

    #[cfg_attr(feature = "sqlx", sqlx(rename = "restriction_kind_id"))]
    pub kind: RestrictionKind,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// Staff account. Only looked up and updated here; passwords stay hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub access_level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_date_range_rejects_empty_and_inverted() {
        assert_eq!(
            DateRange::new(jan(5), jan(5)),
            Err(ValidationError::InvalidRange {
                start: jan(5),
                end: jan(5)
            })
        );
        assert!(DateRange::new(jan(6), jan(5)).is_err());
    }

    #[test]
    fn test_date_range_rejects_unstorable_years() {
        let last = NaiveDate::from_ymd_opt(9999, 12, 30).unwrap();
        let past_max = NaiveDate::from_ymd_opt(10000, 1, 5).unwrap();
        assert_eq!(
            DateRange::new(last, past_max),
            Err(ValidationError::DateOutOfRange { date: past_max })
        );

        let before_min = NaiveDate::from_ymd_opt(-1, 12, 30).unwrap();
        let first = NaiveDate::from_ymd_opt(0, 1, 2).unwrap();
        assert_eq!(
            DateRange::new(before_min, first),
            Err(ValidationError::DateOutOfRange { date: before_min })
        );

        let dec31 = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert!(DateRange::new(last, dec31).is_ok());
        assert!(DateRange::new(NaiveDate::from_ymd_opt(0, 1, 1).unwrap(), first).is_ok());
    }

    #[test]
    fn test_date_range_nights() {
        let stay = DateRange::new(jan(1), jan(5)).unwrap();
        assert_eq!(stay.nights(), 4);
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let stay = DateRange::new(jan(1), jan(5)).unwrap();
        assert!(!stay.overlaps(jan(5), jan(10)));
        let dec28 = NaiveDate::from_ymd_opt(2023, 12, 28).unwrap();
        assert!(!stay.overlaps(dec28, jan(1)));
    }

    #[test]
    fn test_overlapping_ranges() {
        let stay = DateRange::new(jan(1), jan(5)).unwrap();
        assert!(stay.overlaps(jan(3), jan(6)));
        assert!(stay.overlaps(jan(2), jan(3)));
        assert!(stay.overlaps(jan(1), jan(5)));
    }

    #[test]
    fn test_restriction_kind_ids() {
        assert_eq!(RestrictionKind::Reservation.id(), 1);
        assert_eq!(RestrictionKind::OwnerBlock.id(), 2);
    }

    #[test]
    fn test_user_hides_password_hash() {
        let user = User {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            access_level: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}
