//! # Repository Module
//!
//! SQLite implementations of the store's concerns.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  &dyn Repository (contract.rs)                                  │
//! │       ▼                                                                 │
//! │  Database ──┬── units()         → UnitRepository                       │
//! │             ├── availability()  → AvailabilityRepository (read)        │
//! │             ├── bookings()      → BookingCoordinator     (write txn)   │
//! │             ├── reservations()  → ReservationRepository                │
//! │             └── users()         → UserRepository                       │
//! │       │                                                                 │
//! │       │  Parameterized SQL, every call bounded by with_timeout()        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{DbError, DbResult};

pub mod availability;
pub mod booking;
pub mod model;
pub mod reservation;
pub mod unit;
pub mod user;

/// Overlap predicate shared by the availability index and the booking
/// coordinator. Binds: `?1 = unit_id, ?2 = start, ?3 = end`.
pub(crate) const OVERLAP_COUNT_SQL: &str = r#"
    SELECT COUNT(id)
    FROM restrictions
    WHERE unit_id = ?1
      AND ?2 < end_date
      AND ?3 > start_date
"#;

/// Runs a store operation under an upper time bound.
///
/// On expiry the inner future is dropped, which cancels the in-flight
/// statement and rolls back any open transaction it owned.
pub(crate) async fn with_timeout<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, limit_ms = limit.as_millis() as u64, "Store operation timed out");
            Err(DbError::Timeout { operation, limit })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let value = with_timeout("noop", Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_with_timeout_cancels_slow_operation() {
        let err = with_timeout("slow", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DbError::Timeout { operation: "slow", .. }));
    }
}
