//! # Unit Repository
//!
//! Read-only catalog of bookable units. The only write is [`UnitRepository::insert`],
//! used by the `seed` binary and test fixtures; the booking engine itself
//! never mutates units.

use std::time::Duration;

use chrono::Utc;
use innkeep_core::{validation, Unit};
use sqlx::SqlitePool;
use tracing::debug;

use super::with_timeout;
use crate::error::{DbError, DbResult};

/// Repository for unit lookups.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl UnitRepository {
    /// Creates a new UnitRepository.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        UnitRepository { pool, timeout }
    }

    /// Lists every unit ordered by id.
    pub async fn all(&self) -> DbResult<Vec<Unit>> {
        with_timeout("all_units", self.timeout, async {
            let units = sqlx::query_as::<_, Unit>(
                "SELECT id, name, created_at, updated_at FROM units ORDER BY id",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(units)
        })
        .await
    }

    /// Gets a unit by its ID.
    ///
    /// ## Returns
    /// * `Ok(Unit)` - Unit found
    /// * `Err(DbError::NotFound)` - No such unit
    pub async fn get_by_id(&self, id: i64) -> DbResult<Unit> {
        with_timeout("get_unit_by_id", self.timeout, async {
            sqlx::query_as::<_, Unit>(
                "SELECT id, name, created_at, updated_at FROM units WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Unit", id))
        })
        .await
    }

    /// Inserts a unit and returns it.
    pub async fn insert(&self, name: &str) -> DbResult<Unit> {
        validation::validate_name("unit name", name)?;
        let name = name.trim();
        let now = Utc::now();

        debug!(name = %name, "Inserting unit");

        with_timeout("insert_unit", self.timeout, async {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO units (name, created_at, updated_at) VALUES (?1, ?2, ?2) RETURNING id",
            )
            .bind(name)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

            Ok(Unit {
                id,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_insert_and_list_in_id_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let units = db.units();

        let a = units.insert("General's Quarters").await.unwrap();
        let b = units.insert("Major's Suite").await.unwrap();

        let all = units.all().await.unwrap();
        assert_eq!(all.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(all[1].name, "Major's Suite");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let unit = db.units().insert("Garden Room").await.unwrap();

        let fetched = db.units().get_by_id(unit.id).await.unwrap();
        assert_eq!(fetched.name, "Garden Room");

        let missing = db.units().get_by_id(999).await.unwrap_err();
        assert!(matches!(missing, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.units().insert("  ").await.unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));
    }
}
