//! # Booking Coordinator
//!
//! Creates a reservation and its restriction as one unit of work.
//!
//! ## Booking Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create_reservation()                              │
//! │                                                                         │
//! │  0. Validate guest fields (DateRange already guarantees start < end)   │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │                                                                 │   │
//! │  │  1. UPDATE units SET updated_at = updated_at WHERE id = ?      │   │
//! │  │     └── first statement is a write: takes SQLite's write lock  │   │
//! │  │         before anything is read, so concurrent bookings queue  │   │
//! │  │         here and each sees the previous one's commit            │   │
//! │  │                                                                 │   │
//! │  │  2. SELECT COUNT(id) FROM restrictions WHERE <overlap>         │   │
//! │  │     └── > 0 → rollback, DbError::Conflict                       │   │
//! │  │                                                                 │   │
//! │  │  3. INSERT INTO reservations ... RETURNING id                  │   │
//! │  │  4. INSERT INTO restrictions (reservation_id = id, kind = 1)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← Both rows or neither. Dropping the transaction on any        │
//! │           error (or timeout) rolls it back.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No application-level mutex is involved; isolation comes from the store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use innkeep_core::{DateRange, NewReservation, RestrictionKind};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::{with_timeout, OVERLAP_COUNT_SQL};
use crate::error::{DbError, DbResult};

/// Coordinator for writes that must re-check availability.
#[derive(Debug, Clone)]
pub struct BookingCoordinator {
    pool: SqlitePool,
    timeout: Duration,
}

impl BookingCoordinator {
    /// Creates a new BookingCoordinator.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        BookingCoordinator { pool, timeout }
    }

    /// Books `new.stay` on `new.unit_id` for the guest.
    ///
    /// ## Returns
    /// * `Ok(id)` - Reservation and restriction committed
    /// * `Err(DbError::Conflict)` - An overlapping restriction exists
    /// * `Err(DbError::NotFound)` - No such unit
    /// * `Err(DbError::Invalid)` - Guest fields failed validation
    pub async fn create_reservation(&self, new: &NewReservation) -> DbResult<i64> {
        new.validate()?;
        let stay = new.stay;

        debug!(unit_id = new.unit_id, start = %stay.start(), end = %stay.end(), "Creating reservation");

        let reservation_id = with_timeout("create_reservation", self.timeout, async {
            let mut tx = self.pool.begin().await?;
            let now = Utc::now();

            lock_unit(&mut tx, new.unit_id).await?;
            ensure_free(&mut tx, new.unit_id, stay).await?;

            let reservation_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO reservations (
                    first_name, last_name, email, phone,
                    start_date, end_date, unit_id,
                    created_at, updated_at, processed
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, 0)
                RETURNING id
                "#,
            )
            .bind(new.first_name.trim())
            .bind(new.last_name.trim())
            .bind(new.email.trim())
            .bind(new.phone.trim())
            .bind(stay.start())
            .bind(stay.end())
            .bind(new.unit_id)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

            insert_restriction(
                &mut tx,
                new.unit_id,
                stay,
                Some(reservation_id),
                RestrictionKind::Reservation,
                now,
            )
            .await?;

            tx.commit().await?;
            Ok(reservation_id)
        })
        .await?;

        info!(reservation_id, unit_id = new.unit_id, nights = stay.nights(), "Reservation committed");
        Ok(reservation_id)
    }

    /// Blocks a unit for `stay` without a reservation (owner stay, maintenance).
    ///
    /// Same lock, check, insert sequence as a booking; overlapping an
    /// existing restriction fails with `Conflict`.
    pub async fn block_unit(&self, unit_id: i64, stay: DateRange) -> DbResult<i64> {
        let restriction_id = with_timeout("block_unit", self.timeout, async {
            let mut tx = self.pool.begin().await?;
            let now = Utc::now();

            lock_unit(&mut tx, unit_id).await?;
            ensure_free(&mut tx, unit_id, stay).await?;
            let id = insert_restriction(
                &mut tx,
                unit_id,
                stay,
                None,
                RestrictionKind::OwnerBlock,
                now,
            )
            .await?;

            tx.commit().await?;
            Ok(id)
        })
        .await?;

        info!(restriction_id, unit_id, start = %stay.start(), end = %stay.end(), "Unit blocked");
        Ok(restriction_id)
    }
}

/// Takes the write lock by touching the unit row; also proves the unit exists.
async fn lock_unit(conn: &mut SqliteConnection, unit_id: i64) -> DbResult<()> {
    let result = sqlx::query("UPDATE units SET updated_at = updated_at WHERE id = ?1")
        .bind(unit_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Unit", unit_id));
    }
    Ok(())
}

async fn ensure_free(conn: &mut SqliteConnection, unit_id: i64, stay: DateRange) -> DbResult<()> {
    let overlapping: i64 = sqlx::query_scalar(OVERLAP_COUNT_SQL)
        .bind(unit_id)
        .bind(stay.start())
        .bind(stay.end())
        .fetch_one(&mut *conn)
        .await?;

    if overlapping > 0 {
        warn!(unit_id, start = %stay.start(), end = %stay.end(), overlapping, "Booking conflict");
        return Err(DbError::Conflict {
            unit_id,
            start: stay.start(),
            end: stay.end(),
        });
    }
    Ok(())
}

async fn insert_restriction(
    conn: &mut SqliteConnection,
    unit_id: i64,
    stay: DateRange,
    reservation_id: Option<i64>,
    kind: RestrictionKind,
    now: DateTime<Utc>,
) -> DbResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO restrictions (
            start_date, end_date, unit_id, reservation_id,
            restriction_kind_id, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        RETURNING id
        "#,
    )
    .bind(stay.start())
    .bind(stay.end())
    .bind(unit_id)
    .bind(reservation_id)
    .bind(kind.id())
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use innkeep_core::{DateRange, NewReservation, RestrictionKind};

    use crate::{Database, DbConfig, DbError};

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn guest(unit_id: i64, start: u32, end: u32) -> NewReservation {
        NewReservation {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-0100".to_string(),
            unit_id,
            stay: DateRange::new(jan(start), jan(end)).unwrap(),
        }
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let unit = db.units().insert("General's Quarters").await.unwrap();
        (db, unit.id)
    }

    async fn count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_creates_reservation_with_linked_restriction() {
        let (db, unit_id) = setup().await;

        let id = db.bookings().create_reservation(&guest(unit_id, 1, 5)).await.unwrap();

        let restrictions = db.availability().restrictions_for_unit(unit_id).await.unwrap();
        assert_eq!(restrictions.len(), 1);
        assert_eq!(restrictions[0].reservation_id, Some(id));
        assert_eq!(restrictions[0].kind, RestrictionKind::Reservation);
        assert_eq!(restrictions[0].start_date, jan(1));
        assert_eq!(restrictions[0].end_date, jan(5));
    }

    #[tokio::test]
    async fn test_touching_stays_both_succeed() {
        let (db, unit_id) = setup().await;

        db.bookings().create_reservation(&guest(unit_id, 1, 5)).await.unwrap();
        db.bookings().create_reservation(&guest(unit_id, 5, 10)).await.unwrap();

        assert_eq!(count(&db, "reservations").await, 2);
    }

    #[tokio::test]
    async fn test_overlapping_stay_conflicts() {
        let (db, unit_id) = setup().await;

        db.bookings().create_reservation(&guest(unit_id, 1, 5)).await.unwrap();
        let err = db
            .bookings()
            .create_reservation(&guest(unit_id, 3, 6))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(count(&db, "reservations").await, 1);
        assert_eq!(count(&db, "restrictions").await, 1);
    }

    #[tokio::test]
    async fn test_owner_block_conflicts_with_booking() {
        let (db, unit_id) = setup().await;

        db.bookings()
            .block_unit(unit_id, DateRange::new(jan(2), jan(4)).unwrap())
            .await
            .unwrap();
        let err = db
            .bookings()
            .create_reservation(&guest(unit_id, 1, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_unknown_unit_not_found() {
        let (db, _) = setup().await;

        let err = db.bookings().create_reservation(&guest(42, 1, 5)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(count(&db, "reservations").await, 0);
    }

    #[tokio::test]
    async fn test_invalid_guest_rejected_before_store() {
        let (db, unit_id) = setup().await;
        let mut new = guest(unit_id, 1, 5);
        new.email = "not-an-email".to_string();

        let err = db.bookings().create_reservation(&new).await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
        assert_eq!(count(&db, "reservations").await, 0);
    }

    #[tokio::test]
    async fn test_failed_restriction_insert_leaves_no_rows() {
        let (db, unit_id) = setup().await;
        sqlx::query(
            r#"
            CREATE TRIGGER fail_restriction_insert BEFORE INSERT ON restrictions
            BEGIN
                SELECT RAISE(ABORT, 'forced restriction failure');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db
            .bookings()
            .create_reservation(&guest(unit_id, 1, 5))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Store(_)));
        assert_eq!(count(&db, "reservations").await, 0);
        assert_eq!(count(&db, "restrictions").await, 0);
    }
}
