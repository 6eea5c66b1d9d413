//! Staff-side reservation management commands.

use std::io::Write;

use innkeep_core::Reservation;
use serde::Serialize;

use super::{write_json, Context};
use crate::cli::UpdateArgs;
use crate::error::CliResult;

fn write_row<W: Write>(out: &mut W, r: &Reservation) -> CliResult<()> {
    let status = if r.processed { "processed" } else { "new" };
    writeln!(
        out,
        "{:>4}  {} .. {}  {:<20}  {:<24}  {:<28}  {}",
        r.id,
        r.start_date,
        r.end_date,
        r.unit.name,
        r.guest_name(),
        r.email,
        status
    )?;
    Ok(())
}

pub async fn list<W: Write>(ctx: &Context<'_>, only_new: bool, out: &mut W) -> CliResult<()> {
    let reservations = if only_new {
        ctx.repo.new_reservations().await?
    } else {
        ctx.repo.all_reservations().await?
    };

    if ctx.json {
        return write_json(out, &reservations);
    }
    for r in &reservations {
        write_row(out, r)?;
    }
    Ok(())
}

pub async fn show<W: Write>(ctx: &Context<'_>, id: i64, out: &mut W) -> CliResult<()> {
    let r = ctx.repo.get_reservation_by_id(id).await?;
    if ctx.json {
        return write_json(out, &r);
    }
    writeln!(out, "Reservation {}", r.id)?;
    writeln!(out, "  Guest:     {}", r.guest_name())?;
    writeln!(out, "  Email:     {}", r.email)?;
    writeln!(out, "  Phone:     {}", r.phone)?;
    writeln!(out, "  Unit:      {} ({})", r.unit.name, r.unit.id)?;
    writeln!(out, "  Arrival:   {}", r.start_date)?;
    writeln!(out, "  Departure: {}", r.end_date)?;
    writeln!(out, "  Processed: {}", if r.processed { "yes" } else { "no" })?;
    Ok(())
}

/// Applies only the flags that were given, then saves.
pub async fn update<W: Write>(ctx: &Context<'_>, args: &UpdateArgs, out: &mut W) -> CliResult<()> {
    let mut r = ctx.repo.get_reservation_by_id(args.id).await?;
    if let Some(v) = &args.first_name {
        r.first_name = v.clone();
    }
    if let Some(v) = &args.last_name {
        r.last_name = v.clone();
    }
    if let Some(v) = &args.email {
        r.email = v.clone();
    }
    if let Some(v) = &args.phone {
        r.phone = v.clone();
    }

    ctx.repo.update_reservation(&r).await?;
    let saved = ctx.repo.get_reservation_by_id(args.id).await?;

    if ctx.json {
        return write_json(out, &saved);
    }
    writeln!(out, "Reservation {} updated", saved.id)?;
    Ok(())
}

#[derive(Serialize)]
struct Ack {
    id: i64,
    action: &'static str,
}

pub async fn process<W: Write>(
    ctx: &Context<'_>,
    id: i64,
    processed: bool,
    out: &mut W,
) -> CliResult<()> {
    ctx.repo.set_processed(id, processed).await?;
    let action = if processed { "processed" } else { "unprocessed" };
    if ctx.json {
        return write_json(out, &Ack { id, action });
    }
    writeln!(out, "Reservation {id} marked {action}")?;
    Ok(())
}

pub async fn delete<W: Write>(ctx: &Context<'_>, id: i64, out: &mut W) -> CliResult<()> {
    ctx.repo.delete_reservation(id).await?;
    if ctx.json {
        return write_json(out, &Ack { id, action: "deleted" });
    }
    writeln!(out, "Reservation {id} deleted")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::booking::book;
    use super::super::test_support::*;
    use super::*;
    use crate::error::CliError;
    use crate::notify::Mailer;
    use innkeep_db::Repository;

    #[tokio::test]
    async fn test_process_and_list_new() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: false,
        };
        book(&ctx, &book_args(1, 1, 3), &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        list(&ctx, true, &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("new"));

        let id = repo.all_reservations().await.unwrap()[0].id;
        process(&ctx, id, true, &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        list(&ctx, true, &mut out).await.unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_update_only_given_fields() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: false,
        };
        book(&ctx, &book_args(2, 1, 3), &mut Vec::new()).await.unwrap();
        let id = repo.all_reservations().await.unwrap()[0].id;

        let args = UpdateArgs {
            id,
            first_name: None,
            last_name: None,
            email: None,
            phone: Some("555-0142".to_string()),
        };
        update(&ctx, &args, &mut Vec::new()).await.unwrap();

        let saved = repo.get_reservation_by_id(id).await.unwrap();
        assert_eq!(saved.phone, "555-0142");
        assert_eq!(saved.first_name, "Jane");
    }

    #[tokio::test]
    async fn test_delete_then_show_not_found() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: true,
        };
        book(&ctx, &book_args(1, 1, 3), &mut Vec::new()).await.unwrap();
        let id = repo.all_reservations().await.unwrap()[0].id;

        let mut out = Vec::new();
        delete(&ctx, id, &mut out).await.unwrap();
        let ack: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(ack["action"], "deleted");

        let err = show(&ctx, id, &mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, CliError::NotFound(_)));
    }
}
