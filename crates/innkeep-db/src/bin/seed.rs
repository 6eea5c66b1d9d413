//! # Seed Data Generator
//!
//! Populates the database with the inn's rooms and an admin account for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./innkeep_dev.db
//! cargo run -p innkeep-db --bin seed
//!
//! # Specify database path
//! cargo run -p innkeep-db --bin seed -- --db ./data/innkeep.db
//!
//! # Also add a few sample reservations starting today
//! cargo run -p innkeep-db --bin seed -- --sample
//! ```

use std::env;

use chrono::{Days, Utc};
use innkeep_core::{DateRange, NewReservation};
use innkeep_db::{Database, DbConfig, Repository};

/// Rooms offered by the inn.
const UNITS: &[&str] = &["General's Quarters", "Major's Suite", "Colonel's Cabin"];

/// Guests for `--sample`: (first, last, unit index, offset days, nights).
const SAMPLE_GUESTS: &[(&str, &str, usize, u64, u64)] = &[
    ("John", "Smith", 0, 3, 2),
    ("Maria", "Garcia", 1, 7, 4),
    ("Wei", "Chen", 0, 10, 1),
];

/// Placeholder hash; real hashes come from the login service.
const DEV_ADMIN_HASH: &str = "$2a$12$devdevdevdevdevdevdevuO3rV1Jq7m1m9a7r0Vb3fQe1bX0h2s6";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./innkeep_dev.db");
    let mut sample = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--sample" | "-s" => sample = true,
            "--help" | "-h" => {
                println!("Innkeep Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./innkeep_dev.db)");
                println!("  -s, --sample       Add sample reservations");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Innkeep Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.all_units().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} units", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let mut unit_ids = Vec::with_capacity(UNITS.len());
    for name in UNITS {
        let unit = db.units().insert(name).await?;
        println!("  + unit {:>3}  {}", unit.id, unit.name);
        unit_ids.push(unit.id);
    }

    db.users()
        .insert("Admin", "User", "admin@innkeep.local", DEV_ADMIN_HASH, 3)
        .await?;
    println!("  + user admin@innkeep.local");

    if sample {
        let today = Utc::now().date_naive();
        for (first, last, unit_idx, offset, nights) in SAMPLE_GUESTS {
            let (Some(start), Some(end)) = (
                today.checked_add_days(Days::new(*offset)),
                today.checked_add_days(Days::new(offset + nights)),
            ) else {
                continue;
            };

            let new = NewReservation {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}.{}@example.com", first, last).to_lowercase(),
                phone: String::new(),
                unit_id: unit_ids[*unit_idx],
                stay: DateRange::new(start, end)?,
            };

            match db.create_reservation(&new).await {
                Ok(id) => println!("  + reservation {:>3}  {} {} {}..{}", id, first, last, start, end),
                Err(e) => eprintln!("Failed to book {} {}: {}", first, last, e),
            }
        }
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");
    Ok(())
}
