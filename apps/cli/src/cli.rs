//! CLI structure and command definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Front-desk tool for searching availability and managing reservations.
#[derive(Debug, Parser)]
#[command(name = "innkeep")]
#[command(version, about = "Search availability and manage reservations", long_about = None)]
pub struct Cli {
    /// Database file (overrides INNKEEP_DB_PATH)
    #[arg(long, value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Per-query timeout in seconds (overrides INNKEEP_QUERY_TIMEOUT_SECS)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub query_timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all units
    Units,

    /// Find units free for a stay
    Search(StayArgs),

    /// Check whether one unit is free for a stay
    Check {
        /// Unit ID
        #[arg(long)]
        unit: i64,

        #[command(flatten)]
        stay: StayArgs,
    },

    /// Book a unit for a guest
    Book(BookArgs),

    /// Block a unit without a reservation (owner stay, maintenance)
    Block {
        /// Unit ID
        #[arg(long)]
        unit: i64,

        #[command(flatten)]
        stay: StayArgs,
    },

    /// Show a unit's blocked intervals
    Restrictions {
        /// Unit ID
        #[arg(long)]
        unit: i64,
    },

    /// List reservations
    List {
        /// Only reservations not yet processed
        #[arg(long)]
        new: bool,
    },

    /// Show one reservation
    Show {
        /// Reservation ID
        id: i64,
    },

    /// Edit guest details of a reservation
    Update(UpdateArgs),

    /// Mark a reservation as processed
    Process {
        /// Reservation ID
        id: i64,

        /// Mark as unprocessed instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete a reservation and free its dates
    Delete {
        /// Reservation ID
        id: i64,
    },
}

/// Arrival and departure dates (`YYYY-MM-DD`).
#[derive(Debug, Clone, Args)]
pub struct StayArgs {
    /// Arrival date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: NaiveDate,

    /// Departure date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    /// Unit ID
    #[arg(long)]
    pub unit: i64,

    #[command(flatten)]
    pub stay: StayArgs,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Reservation ID
    pub id: i64,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}
