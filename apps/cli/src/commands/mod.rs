//! Command implementations.
//!
//! Every command talks to the store through `&dyn Repository` only, so the
//! same code runs against SQLite in the binary and the in-memory variant in
//! tests.

pub mod availability;
pub mod booking;
pub mod reservations;

use std::io::Write;

use innkeep_db::Repository;
use serde::Serialize;

use crate::cli::Command;
use crate::error::CliResult;
use crate::notify::Mailer;

/// What a command needs besides its arguments.
pub struct Context<'a> {
    pub repo: &'a dyn Repository,
    pub mailer: &'a Mailer,
    pub json: bool,
}

/// Runs one parsed command, writing its result to `out`.
pub async fn execute<W: Write>(command: Command, ctx: &Context<'_>, out: &mut W) -> CliResult<()> {
    match command {
        Command::Units => availability::units(ctx, out).await,
        Command::Search(stay) => availability::search(ctx, &stay, out).await,
        Command::Check { unit, stay } => availability::check(ctx, unit, &stay, out).await,
        Command::Block { unit, stay } => availability::block(ctx, unit, &stay, out).await,
        Command::Restrictions { unit } => availability::restrictions(ctx, unit, out).await,
        Command::Book(args) => booking::book(ctx, &args, out).await,
        Command::List { new } => reservations::list(ctx, new, out).await,
        Command::Show { id } => reservations::show(ctx, id, out).await,
        Command::Update(args) => reservations::update(ctx, &args, out).await,
        Command::Process { id, undo } => reservations::process(ctx, id, !undo, out).await,
        Command::Delete { id } => reservations::delete(ctx, id, out).await,
    }
}

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use innkeep_db::MemoryRepository;

    use crate::cli::{BookArgs, StayArgs};

    pub fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    pub fn stay(start: u32, end: u32) -> StayArgs {
        StayArgs {
            start: jan(start),
            end: jan(end),
        }
    }

    pub fn book_args(unit: i64, start: u32, end: u32) -> BookArgs {
        BookArgs {
            unit,
            stay: stay(start, end),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
        }
    }

    /// Memory store with "General's Quarters" (id 1) and "Major's Suite" (id 2).
    pub async fn repo() -> MemoryRepository {
        let repo = MemoryRepository::new();
        repo.add_unit("General's Quarters").await.unwrap();
        repo.add_unit("Major's Suite").await.unwrap();
        repo
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_execute_dispatches_and_prints_json() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: true,
        };

        let mut out = Vec::new();
        execute(Command::Search(stay(1, 3)), &ctx, &mut out).await.unwrap();

        let units: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(units.as_array().unwrap().len(), 2);
        assert_eq!(units[1]["name"], "Major's Suite");
    }
}
