//! # Reservation Repository
//!
//! Staff-facing management of persisted reservations.
//!
//! ## Reservation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Reservation Lifecycle                             │
//! │                                                                         │
//! │  1. CREATE (BookingCoordinator)                                        │
//! │     └── reservation + restriction, processed = 0                       │
//! │                                                                         │
//! │  2. REVIEW                                                             │
//! │     └── new_reservations() / all_reservations() / get_by_id()          │
//! │                                                                         │
//! │  3. EDIT (optional)                                                    │
//! │     └── update() → names, email, phone only                            │
//! │                                                                         │
//! │  4. PROCESS                                                            │
//! │     └── set_processed(id, true)                                        │
//! │                                                                         │
//! │  5. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → restriction, then reservation, one transaction      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::Utc;
use innkeep_core::{validation, Reservation};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::model::{ReservationRow, RESERVATION_SELECT};
use super::with_timeout;
use crate::error::{DbError, DbResult};

/// Repository for reservation management.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        ReservationRepository { pool, timeout }
    }

    /// Lists every reservation ordered by start date.
    pub async fn all(&self) -> DbResult<Vec<Reservation>> {
        with_timeout("all_reservations", self.timeout, async {
            let sql = format!("{RESERVATION_SELECT} ORDER BY r.start_date ASC, r.id ASC");
            let rows = sqlx::query_as::<_, ReservationRow>(&sql)
                .fetch_all(&self.pool)
                .await?;
            Ok(rows.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    /// Lists unprocessed reservations ordered by start date.
    pub async fn new_reservations(&self) -> DbResult<Vec<Reservation>> {
        with_timeout("new_reservations", self.timeout, async {
            let sql = format!(
                "{RESERVATION_SELECT} WHERE r.processed = 0 ORDER BY r.start_date ASC, r.id ASC"
            );
            let rows = sqlx::query_as::<_, ReservationRow>(&sql)
                .fetch_all(&self.pool)
                .await?;
            Ok(rows.into_iter().map(Reservation::from).collect())
        })
        .await
    }

    /// Gets a reservation by its ID.
    ///
    /// ## Returns
    /// * `Ok(Reservation)` - Found, with its unit snapshot
    /// * `Err(DbError::NotFound)` - No such reservation
    pub async fn get_by_id(&self, id: i64) -> DbResult<Reservation> {
        with_timeout("get_reservation_by_id", self.timeout, async {
            let sql = format!("{RESERVATION_SELECT} WHERE r.id = ?1");
            sqlx::query_as::<_, ReservationRow>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(Reservation::from)
                .ok_or_else(|| DbError::not_found("Reservation", id))
        })
        .await
    }

    /// Rewrites the guest-editable fields of a reservation.
    ///
    /// Only first/last name, email, phone and `updated_at` change; dates,
    /// unit and processed flag are left alone.
    pub async fn update(&self, reservation: &Reservation) -> DbResult<()> {
        validation::validate_guest(
            &reservation.first_name,
            &reservation.last_name,
            &reservation.email,
            &reservation.phone,
        )?;

        debug!(id = reservation.id, "Updating reservation");

        with_timeout("update_reservation", self.timeout, async {
            let result = sqlx::query(
                r#"
                UPDATE reservations SET
                    first_name = ?1,
                    last_name = ?2,
                    email = ?3,
                    phone = ?4,
                    updated_at = ?5
                WHERE id = ?6
                "#,
            )
            .bind(reservation.first_name.trim())
            .bind(reservation.last_name.trim())
            .bind(reservation.email.trim())
            .bind(reservation.phone.trim())
            .bind(Utc::now())
            .bind(reservation.id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Reservation", reservation.id));
            }
            Ok(())
        })
        .await
    }

    /// Deletes a reservation and its restriction in one transaction.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        with_timeout("delete_reservation", self.timeout, async {
            let mut tx = self.pool.begin().await?;

            let released = sqlx::query("DELETE FROM restrictions WHERE reservation_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            let result = sqlx::query("DELETE FROM reservations WHERE id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Reservation", id));
            }

            tx.commit().await?;
            info!(id, released, "Reservation deleted");
            Ok(())
        })
        .await
    }

    /// Sets the processed flag.
    pub async fn set_processed(&self, id: i64, processed: bool) -> DbResult<()> {
        with_timeout("set_processed", self.timeout, async {
            let result = sqlx::query("UPDATE reservations SET processed = ?1 WHERE id = ?2")
                .bind(processed)
                .bind(id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Reservation", id));
            }

            debug!(id, processed, "Reservation processed flag set");
            Ok(())
        })
        .await
    }
}
