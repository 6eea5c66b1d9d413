//! Row shapes for queries that don't map 1:1 onto a domain type.

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_core::{Reservation, UnitRef};

/// Column list for reservation reads, left-joined with `units`.
pub(crate) const RESERVATION_SELECT: &str = r#"
    SELECT
        r.id, r.first_name, r.last_name, r.email, r.phone,
        r.start_date, r.end_date, r.unit_id,
        r.created_at, r.updated_at, r.processed,
        u.name AS unit_name
    FROM reservations r
    LEFT JOIN units u ON (r.unit_id = u.id)
"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ReservationRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub unit_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed: bool,
    pub unit_name: Option<String>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            start_date: row.start_date,
            end_date: row.end_date,
            unit_id: row.unit_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            processed: row.processed,
            unit: UnitRef {
                id: row.unit_id,
                name: row.unit_name.unwrap_or_default(),
            },
        }
    }
}
