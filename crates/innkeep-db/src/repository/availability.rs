//! # Availability Repository
//!
//! Answers "which units are free" and "is this unit free" for a stay.
//!
//! ## Overlap Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A restriction [s, e) blocks a requested stay [start, end) iff          │
//! │                                                                         │
//! │        start < e  AND  end > s                                          │
//! │                                                                         │
//! │  existing   [01 ──────── 05)                                            │
//! │  request              [05 ──────── 10)   free (touching)                │
//! │  request         [03 ──────── 06)        blocked                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results are advisory: nothing is held between a search and a booking.
//! The booking coordinator re-checks inside its own transaction.

use std::time::Duration;

use chrono::NaiveDate;
use innkeep_core::{DateRange, Restriction, Unit};
use sqlx::SqlitePool;
use tracing::debug;

use super::{with_timeout, OVERLAP_COUNT_SQL};
use crate::error::DbResult;

/// Repository for availability queries.
#[derive(Debug, Clone)]
pub struct AvailabilityRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl AvailabilityRepository {
    /// Creates a new AvailabilityRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        AvailabilityRepository { pool, timeout }
    }

    /// Returns true iff no restriction on `unit_id` overlaps `[start, end)`.
    ///
    /// An unknown unit has no restrictions and therefore reads as free;
    /// booking it fails later with `NotFound`.
    pub async fn is_unit_free(
        &self,
        unit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<bool> {
        let stay = DateRange::new(start, end)?;

        with_timeout("is_unit_free", self.timeout, async {
            let overlapping: i64 = sqlx::query_scalar(OVERLAP_COUNT_SQL)
                .bind(unit_id)
                .bind(stay.start())
                .bind(stay.end())
                .fetch_one(&self.pool)
                .await?;

            debug!(unit_id, %start, %end, overlapping, "Checked unit availability");
            Ok(overlapping == 0)
        })
        .await
    }

    /// Lists every unit with no overlapping restriction, ordered by id.
    pub async fn free_units_for_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Unit>> {
        let stay = DateRange::new(start, end)?;

        with_timeout("free_units_for_range", self.timeout, async {
            let units = sqlx::query_as::<_, Unit>(
                r#"
                SELECT u.id, u.name, u.created_at, u.updated_at
                FROM units u
                WHERE NOT EXISTS (
                    SELECT 1
                    FROM restrictions rr
                    WHERE rr.unit_id = u.id
                      AND ?1 < rr.end_date
                      AND ?2 > rr.start_date
                )
                ORDER BY u.id ASC
                "#,
            )
            .bind(stay.start())
            .bind(stay.end())
            .fetch_all(&self.pool)
            .await?;

            debug!(%start, %end, free = units.len(), "Searched availability");
            Ok(units)
        })
        .await
    }

    /// Lists a unit's restrictions ordered by start date.
    pub async fn restrictions_for_unit(&self, unit_id: i64) -> DbResult<Vec<Restriction>> {
        with_timeout("restrictions_for_unit", self.timeout, async {
            let rows = sqlx::query_as::<_, Restriction>(
                r#"
                SELECT id, start_date, end_date, unit_id, reservation_id,
                       restriction_kind_id, created_at, updated_at
                FROM restrictions
                WHERE unit_id = ?1
                ORDER BY start_date ASC, id ASC
                "#,
            )
            .bind(unit_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use innkeep_core::DateRange;

    use crate::{Database, DbConfig, DbError};

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    async fn setup() -> (Database, Vec<i64>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut ids = Vec::new();
        for name in ["Alpha", "Bravo", "Charlie"] {
            ids.push(db.units().insert(name).await.unwrap().id);
        }
        (db, ids)
    }

    #[tokio::test]
    async fn test_empty_store_everything_free() {
        let (db, ids) = setup().await;

        assert!(db.availability().is_unit_free(ids[0], jan(1), jan(5)).await.unwrap());
        let free = db.availability().free_units_for_range(jan(1), jan(5)).await.unwrap();
        assert_eq!(free.len(), 3);
    }

    #[tokio::test]
    async fn test_overlap_is_reported_unavailable() {
        let (db, ids) = setup().await;
        let stay = DateRange::new(jan(1), jan(5)).unwrap();
        db.bookings().block_unit(ids[0], stay).await.unwrap();

        let availability = db.availability();
        assert!(!availability.is_unit_free(ids[0], jan(3), jan(6)).await.unwrap());
        assert!(!availability.is_unit_free(ids[0], jan(2), jan(3)).await.unwrap());
        // touching on either side
        assert!(availability.is_unit_free(ids[0], jan(5), jan(10)).await.unwrap());
        assert!(availability
            .is_unit_free(ids[0], NaiveDate::from_ymd_opt(2023, 12, 28).unwrap(), jan(1))
            .await
            .unwrap());
        // other units unaffected
        assert!(availability.is_unit_free(ids[1], jan(3), jan(6)).await.unwrap());
    }

    #[tokio::test]
    async fn test_free_units_excludes_blocked_in_id_order() {
        let (db, ids) = setup().await;
        db.bookings()
            .block_unit(ids[1], DateRange::new(jan(2), jan(4)).unwrap())
            .await
            .unwrap();
        db.bookings()
            .block_unit(ids[2], DateRange::new(jan(10), jan(12)).unwrap())
            .await
            .unwrap();

        let free = db.availability().free_units_for_range(jan(1), jan(5)).await.unwrap();
        let free_ids: Vec<i64> = free.iter().map(|u| u.id).collect();
        assert_eq!(free_ids, vec![ids[0], ids[2]]);
    }

    #[tokio::test]
    async fn test_empty_range_rejected() {
        let (db, ids) = setup().await;

        let err = db.availability().is_unit_free(ids[0], jan(5), jan(5)).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidRange { .. }));

        let err = db
            .availability()
            .free_units_for_range(jan(6), jan(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn test_past_range_permitted() {
        let (db, _) = setup().await;
        let past_start = NaiveDate::from_ymd_opt(1999, 12, 30).unwrap();
        let past_end = NaiveDate::from_ymd_opt(2000, 1, 2).unwrap();

        let free = db
            .availability()
            .free_units_for_range(past_start, past_end)
            .await
            .unwrap();
        assert_eq!(free.len(), 3);
    }
}
