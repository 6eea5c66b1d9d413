//! # In-Memory Repository
//!
//! A [`Repository`] backed by plain collections, for tests and demos.
//!
//! The whole state sits behind one `tokio::sync::Mutex`; each operation is a
//! single critical section, which plays the role of the SQLite variant's
//! transaction. The same overlap, validation and not-found rules apply.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use innkeep_core::{
    validation, DateRange, NewReservation, Reservation, Restriction, RestrictionKind, Unit,
    UnitRef, User,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::contract::Repository;
use crate::error::{DbError, DbResult, StoreError};

#[derive(Debug, Default)]
struct State {
    units: BTreeMap<i64, Unit>,
    reservations: BTreeMap<i64, Reservation>,
    restrictions: BTreeMap<i64, Restriction>,
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn overlapping(&self, unit_id: i64, start: NaiveDate, end: NaiveDate) -> usize {
        self.restrictions
            .values()
            .filter(|r| r.unit_id == unit_id && start < r.end_date && end > r.start_date)
            .count()
    }

    /// Unit must exist and the stay must be free.
    fn check_bookable(&self, unit_id: i64, stay: DateRange) -> DbResult<()> {
        if !self.units.contains_key(&unit_id) {
            return Err(DbError::not_found("Unit", unit_id));
        }
        if self.overlapping(unit_id, stay.start(), stay.end()) > 0 {
            warn!(unit_id, start = %stay.start(), end = %stay.end(), "Booking conflict");
            return Err(DbError::Conflict {
                unit_id,
                start: stay.start(),
                end: stay.end(),
            });
        }
        Ok(())
    }

    fn insert_restriction(
        &mut self,
        unit_id: i64,
        stay: DateRange,
        reservation_id: Option<i64>,
        kind: RestrictionKind,
    ) -> i64 {
        let id = self.next_id();
        let now = Utc::now();
        self.restrictions.insert(
            id,
            Restriction {
                id,
                start_date: stay.start(),
                end_date: stay.end(),
                unit_id,
                reservation_id,
                kind,
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    /// Mirrors the `users.email UNIQUE` constraint.
    fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> DbResult<()> {
        let taken = self
            .users
            .values()
            .any(|u| u.email == email && Some(u.id) != owner);
        if taken {
            return Err(StoreError::UniqueViolation {
                field: "users.email".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn sorted_reservations(&self, only_new: bool) -> Vec<Reservation> {
        let mut list: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| !only_new || !r.processed)
            .cloned()
            .collect();
        list.sort_by_key(|r| (r.start_date, r.id));
        list
    }
}

/// In-memory variant of the Repository contract.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        MemoryRepository::default()
    }

    /// Adds a unit to the catalog.
    pub async fn add_unit(&self, name: &str) -> DbResult<Unit> {
        validation::validate_name("unit name", name)?;

        let mut state = self.state.lock().await;
        let id = state.next_id();
        let now = Utc::now();
        let unit = Unit {
            id,
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.units.insert(id, unit.clone());
        Ok(unit)
    }

    /// Adds a staff account with an already-hashed password.
    pub async fn add_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        access_level: i64,
    ) -> DbResult<i64> {
        validation::validate_name("first_name", first_name)?;
        validation::validate_name("last_name", last_name)?;
        validation::validate_email(email)?;

        let mut state = self.state.lock().await;
        state.ensure_email_free(email.trim(), None)?;
        let id = state.next_id();
        let now = Utc::now();
        state.users.insert(
            id,
            User {
                id,
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
                email: email.trim().to_string(),
                password_hash: password_hash.to_string(),
                access_level,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn all_units(&self) -> DbResult<Vec<Unit>> {
        Ok(self.state.lock().await.units.values().cloned().collect())
    }

    async fn get_unit_by_id(&self, id: i64) -> DbResult<Unit> {
        self.state
            .lock()
            .await
            .units
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Unit", id))
    }

    async fn is_unit_free(
        &self,
        unit_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<bool> {
        let stay = DateRange::new(start, end)?;
        let state = self.state.lock().await;
        Ok(state.overlapping(unit_id, stay.start(), stay.end()) == 0)
    }

    async fn free_units_for_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Unit>> {
        let stay = DateRange::new(start, end)?;
        let state = self.state.lock().await;
        Ok(state
            .units
            .values()
            .filter(|u| state.overlapping(u.id, stay.start(), stay.end()) == 0)
            .cloned()
            .collect())
    }

    async fn restrictions_for_unit(&self, unit_id: i64) -> DbResult<Vec<Restriction>> {
        let state = self.state.lock().await;
        let mut list: Vec<Restriction> = state
            .restrictions
            .values()
            .filter(|r| r.unit_id == unit_id)
            .cloned()
            .collect();
        list.sort_by_key(|r| (r.start_date, r.id));
        Ok(list)
    }

    async fn create_reservation(&self, new: &NewReservation) -> DbResult<i64> {
        new.validate()?;

        let mut state = self.state.lock().await;
        state.check_bookable(new.unit_id, new.stay)?;

        let unit = state
            .units
            .get(&new.unit_id)
            .map(|u| UnitRef {
                id: u.id,
                name: u.name.clone(),
            })
            .unwrap_or_default();
        let id = state.next_id();
        let now = Utc::now();
        state.reservations.insert(
            id,
            Reservation {
                id,
                first_name: new.first_name.trim().to_string(),
                last_name: new.last_name.trim().to_string(),
                email: new.email.trim().to_string(),
                phone: new.phone.trim().to_string(),
                start_date: new.stay.start(),
                end_date: new.stay.end(),
                unit_id: new.unit_id,
                created_at: now,
                updated_at: now,
                processed: false,
                unit,
            },
        );
        state.insert_restriction(new.unit_id, new.stay, Some(id), RestrictionKind::Reservation);

        debug!(reservation_id = id, unit_id = new.unit_id, "Reservation stored in memory");
        Ok(id)
    }

    async fn block_unit(&self, unit_id: i64, stay: DateRange) -> DbResult<i64> {
        let mut state = self.state.lock().await;
        state.check_bookable(unit_id, stay)?;
        Ok(state.insert_restriction(unit_id, stay, None, RestrictionKind::OwnerBlock))
    }

    async fn all_reservations(&self) -> DbResult<Vec<Reservation>> {
        Ok(self.state.lock().await.sorted_reservations(false))
    }

    async fn new_reservations(&self) -> DbResult<Vec<Reservation>> {
        Ok(self.state.lock().await.sorted_reservations(true))
    }

    async fn get_reservation_by_id(&self, id: i64) -> DbResult<Reservation> {
        self.state
            .lock()
            .await
            .reservations
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Reservation", id))
    }

    async fn update_reservation(&self, reservation: &Reservation) -> DbResult<()> {
        validation::validate_guest(
            &reservation.first_name,
            &reservation.last_name,
            &reservation.email,
            &reservation.phone,
        )?;

        let mut state = self.state.lock().await;
        let stored = state
            .reservations
            .get_mut(&reservation.id)
            .ok_or_else(|| DbError::not_found("Reservation", reservation.id))?;

        stored.first_name = reservation.first_name.trim().to_string();
        stored.last_name = reservation.last_name.trim().to_string();
        stored.email = reservation.email.trim().to_string();
        stored.phone = reservation.phone.trim().to_string();
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_reservation(&self, id: i64) -> DbResult<()> {
        let mut state = self.state.lock().await;
        if state.reservations.remove(&id).is_none() {
            return Err(DbError::not_found("Reservation", id));
        }
        state.restrictions.retain(|_, r| r.reservation_id != Some(id));
        Ok(())
    }

    async fn set_processed(&self, id: i64, processed: bool) -> DbResult<()> {
        let mut state = self.state.lock().await;
        let stored = state
            .reservations
            .get_mut(&id)
            .ok_or_else(|| DbError::not_found("Reservation", id))?;
        stored.processed = processed;
        Ok(())
    }

    async fn get_user_by_id(&self, id: i64) -> DbResult<User> {
        self.state
            .lock()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("User", id))
    }

    async fn update_user(&self, user: &User) -> DbResult<()> {
        validation::validate_name("first_name", &user.first_name)?;
        validation::validate_name("last_name", &user.last_name)?;
        validation::validate_email(&user.email)?;

        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user.id) {
            return Err(DbError::not_found("User", user.id));
        }
        state.ensure_email_free(user.email.trim(), Some(user.id))?;
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| DbError::not_found("User", user.id))?;

        stored.first_name = user.first_name.trim().to_string();
        stored.last_name = user.last_name.trim().to_string();
        stored.email = user.email.trim().to_string();
        stored.access_level = user.access_level;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn user_credentials_by_email(&self, email: &str) -> DbResult<(i64, String)> {
        let email = email.trim();
        self.state
            .lock()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .map(|u| (u.id, u.password_hash.clone()))
            .ok_or_else(|| DbError::not_found("User", email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[tokio::test]
    async fn test_delete_removes_owned_restriction_only() {
        let repo = MemoryRepository::new();
        let unit = repo.add_unit("Loft").await.unwrap();

        repo.block_unit(unit.id, DateRange::new(jan(10), jan(12)).unwrap())
            .await
            .unwrap();
        let id = repo
            .create_reservation(&NewReservation {
                first_name: "Gil".to_string(),
                last_name: "Guest".to_string(),
                email: "gil@example.com".to_string(),
                phone: String::new(),
                unit_id: unit.id,
                stay: DateRange::new(jan(1), jan(3)).unwrap(),
            })
            .await
            .unwrap();

        repo.delete_reservation(id).await.unwrap();

        let left = repo.restrictions_for_unit(unit.id).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].kind, RestrictionKind::OwnerBlock);
    }

    #[tokio::test]
    async fn test_add_user_rejects_taken_email() {
        let repo = MemoryRepository::new();
        repo.add_user("Ada", "Admin", "admin@example.com", "$a$", 3)
            .await
            .unwrap();

        let err = repo
            .add_user("Bo", "Staff", " admin@example.com ", "$b$", 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Store(StoreError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_user_keeps_own_email() {
        let repo = MemoryRepository::new();
        let id = repo
            .add_user("Ada", "Admin", "admin@example.com", "$a$", 3)
            .await
            .unwrap();

        let mut user = repo.get_user_by_id(id).await.unwrap();
        user.access_level = 2;
        repo.update_user(&user).await.unwrap();
        assert_eq!(repo.get_user_by_id(id).await.unwrap().access_level, 2);
    }
}
