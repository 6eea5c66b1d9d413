//! # Repository Contract
//!
//! The capability set callers depend on. Web handlers, the CLI and tests
//! hold a `&dyn Repository` (or `Arc<dyn Repository>`) and never see SQL.
//!
//! ## Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         dyn Repository                                  │
//! │                               │                                         │
//! │              ┌────────────────┴────────────────┐                        │
//! │              ▼                                 ▼                        │
//! │     Database (pool.rs)               MemoryRepository (memory.rs)       │
//! │     SQLite, one per process          tokio Mutex, for tests/demos       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use innkeep_core::{DateRange, NewReservation, Reservation, Restriction, Unit, User};

use crate::error::DbResult;
use crate::pool::Database;

/// Storage-agnostic access to the availability & booking engine.
#[async_trait]
pub trait Repository: Send + Sync {
    // ---- Unit catalog ------------------------------------------------------

    /// Every unit, ordered by id.
    async fn all_units(&self) -> DbResult<Vec<Unit>>;

    /// One unit; `NotFound` on miss.
    async fn get_unit_by_id(&self, id: i64) -> DbResult<Unit>;

    // ---- Availability index ------------------------------------------------

    /// True iff no restriction on the unit overlaps `[start, end)`.
    async fn is_unit_free(&self, unit_id: i64, start: NaiveDate, end: NaiveDate)
        -> DbResult<bool>;

    /// Units with no overlapping restriction, ordered by id.
    async fn free_units_for_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Unit>>;

    /// A unit's restrictions, ordered by start date.
    async fn restrictions_for_unit(&self, unit_id: i64) -> DbResult<Vec<Restriction>>;

    // ---- Booking coordinator -----------------------------------------------

    /// Atomically re-checks availability and persists reservation + restriction.
    async fn create_reservation(&self, new: &NewReservation) -> DbResult<i64>;

    /// Atomically re-checks availability and persists an owner block.
    async fn block_unit(&self, unit_id: i64, stay: DateRange) -> DbResult<i64>;

    // ---- Reservation store -------------------------------------------------

    async fn all_reservations(&self) -> DbResult<Vec<Reservation>>;

    async fn new_reservations(&self) -> DbResult<Vec<Reservation>>;

    async fn get_reservation_by_id(&self, id: i64) -> DbResult<Reservation>;

    /// Rewrites guest-editable fields only.
    async fn update_reservation(&self, reservation: &Reservation) -> DbResult<()>;

    /// Removes the reservation and its restriction.
    async fn delete_reservation(&self, id: i64) -> DbResult<()>;

    async fn set_processed(&self, id: i64, processed: bool) -> DbResult<()>;

    // ---- Accounts (login flow pass-through) --------------------------------

    async fn get_user_by_id(&self, id: i64) -> DbResult<User>;

    async fn update_user(&self, user: &User) -> DbResult<()>;

    /// `(id, password_hash)` for the caller to verify.
    async fn user_credentials_by_email(&self, email: &str) -> DbResult<(i64, String)>;
}

#[async_trait]
impl Repository for Database {
    async fn all_units(&self) -> DbResult<Vec<Unit>> {
        self.units().all().await
    }

    async fn get_unit_by_id(&self, id: i64) -> DbResult<Unit> {
        self.units().get_by_id(id).await
    }

    async fn is_unit_free(
        &self,
        unit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<bool> {
        self.availability().is_unit_free(unit_id, start, end).await
    }

    async fn free_units_for_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Unit>> {
        self.availability().free_units_for_range(start, end).await
    }

    async fn restrictions_for_unit(&self, unit_id: i64) -> DbResult<Vec<Restriction>> {
        self.availability().restrictions_for_unit(unit_id).await
    }

    async fn create_reservation(&self, new: &NewReservation) -> DbResult<i64> {
        self.bookings().create_reservation(new).await
    }

    async fn block_unit(&self, unit_id: i64, stay: DateRange) -> DbResult<i64> {
        self.bookings().block_unit(unit_id, stay).await
    }

    async fn all_reservations(&self) -> DbResult<Vec<Reservation>> {
        self.reservations().all().await
    }

    async fn new_reservations(&self) -> DbResult<Vec<Reservation>> {
        self.reservations().new_reservations().await
    }

    async fn get_reservation_by_id(&self, id: i64) -> DbResult<Reservation> {
        self.reservations().get_by_id(id).await
    }

    async fn update_reservation(&self, reservation: &Reservation) -> DbResult<()> {
        self.reservations().update(reservation).await
    }

    async fn delete_reservation(&self, id: i64) -> DbResult<()> {
        self.reservations().delete(id).await
    }

    async fn set_processed(&self, id: i64, processed: bool) -> DbResult<()> {
        self.reservations().set_processed(id, processed).await
    }

    async fn get_user_by_id(&self, id: i64) -> DbResult<User> {
        self.users().get_by_id(id).await
    }

    async fn update_user(&self, user: &User) -> DbResult<()> {
        self.users().update(user).await
    }

    async fn user_credentials_by_email(&self, email: &str) -> DbResult<(i64, String)> {
        self.users().credentials_by_email(email).await
    }
}
