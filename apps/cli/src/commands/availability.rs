//! Unit catalog and availability commands.

use std::io::Write;

use innkeep_core::DateRange;
use serde::Serialize;
use tracing::debug;

use super::{write_json, Context};
use crate::cli::StayArgs;
use crate::error::CliResult;

pub async fn units<W: Write>(ctx: &Context<'_>, out: &mut W) -> CliResult<()> {
    let units = ctx.repo.all_units().await?;
    if ctx.json {
        return write_json(out, &units);
    }
    for unit in &units {
        writeln!(out, "{:>4}  {}", unit.id, unit.name)?;
    }
    Ok(())
}

/// Units free for the whole stay.
pub async fn search<W: Write>(ctx: &Context<'_>, stay: &StayArgs, out: &mut W) -> CliResult<()> {
    let free = ctx.repo.free_units_for_range(stay.start, stay.end).await?;
    debug!(start = %stay.start, end = %stay.end, found = free.len(), "Availability search");

    if ctx.json {
        return write_json(out, &free);
    }
    if free.is_empty() {
        writeln!(out, "No availability from {} to {}", stay.start, stay.end)?;
        return Ok(());
    }
    writeln!(out, "Available from {} to {}:", stay.start, stay.end)?;
    for unit in &free {
        writeln!(out, "{:>4}  {}", unit.id, unit.name)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct CheckResult {
    unit_id: i64,
    available: bool,
}

pub async fn check<W: Write>(
    ctx: &Context<'_>,
    unit_id: i64,
    stay: &StayArgs,
    out: &mut W,
) -> CliResult<()> {
    let available = ctx.repo.is_unit_free(unit_id, stay.start, stay.end).await?;
    if ctx.json {
        return write_json(out, &CheckResult { unit_id, available });
    }
    let verdict = if available { "available" } else { "not available" };
    writeln!(out, "Unit {} is {} from {} to {}", unit_id, verdict, stay.start, stay.end)?;
    Ok(())
}

#[derive(Serialize)]
struct BlockResult {
    restriction_id: i64,
    unit_id: i64,
    stay: DateRange,
}

pub async fn block<W: Write>(
    ctx: &Context<'_>,
    unit_id: i64,
    stay: &StayArgs,
    out: &mut W,
) -> CliResult<()> {
    let range = DateRange::new(stay.start, stay.end)?;
    let restriction_id = ctx.repo.block_unit(unit_id, range).await?;

    if ctx.json {
        return write_json(
            out,
            &BlockResult {
                restriction_id,
                unit_id,
                stay: range,
            },
        );
    }
    writeln!(
        out,
        "Blocked unit {} from {} to {} (restriction {})",
        unit_id,
        range.start(),
        range.end(),
        restriction_id
    )?;
    Ok(())
}

pub async fn restrictions<W: Write>(ctx: &Context<'_>, unit_id: i64, out: &mut W) -> CliResult<()> {
    let restrictions = ctx.repo.restrictions_for_unit(unit_id).await?;
    if ctx.json {
        return write_json(out, &restrictions);
    }
    for r in &restrictions {
        let source = match r.reservation_id {
            Some(id) => format!("reservation {id}"),
            None => "owner block".to_string(),
        };
        writeln!(out, "{:>4}  {} .. {}  {}", r.id, r.start_date, r.end_date, source)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::CliError;
    use crate::notify::Mailer;

    #[tokio::test]
    async fn test_block_hides_unit_from_search() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: false,
        };

        let mut out = Vec::new();
        block(&ctx, 1, &stay(2, 4), &mut out).await.unwrap();

        let mut out = Vec::new();
        search(&ctx, &stay(1, 3), &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Major's Suite"));
        assert!(!text.contains("General's Quarters"));

        let mut out = Vec::new();
        restrictions(&ctx, 1, &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("owner block"));
    }

    #[tokio::test]
    async fn test_inverted_range_is_invalid() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: false,
        };

        let err = check(&ctx, 1, &stay(5, 2), &mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, CliError::Invalid(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
