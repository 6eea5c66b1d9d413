//! The `book` command: commit a reservation, then queue confirmation mail.

use std::io::Write;

use innkeep_core::{DateRange, NewReservation, Reservation};
use tracing::info;

use super::{write_json, Context};
use crate::cli::BookArgs;
use crate::error::CliResult;
use crate::notify::MailData;

const FRONT_DESK: &str = "front-desk@innkeep.local";
const OWNER: &str = "owner@innkeep.local";

pub async fn book<W: Write>(ctx: &Context<'_>, args: &BookArgs, out: &mut W) -> CliResult<()> {
    let new = NewReservation {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
        unit_id: args.unit,
        stay: DateRange::new(args.stay.start, args.stay.end)?,
    };

    let id = ctx.repo.create_reservation(&new).await?;
    let reservation = ctx.repo.get_reservation_by_id(id).await?;
    info!(reservation_id = id, unit = %reservation.unit.name, "Booked");

    // Mail is best effort; the booking is already committed.
    ctx.mailer.send(guest_confirmation(&reservation));
    ctx.mailer.send(owner_notice(&reservation));

    if ctx.json {
        return write_json(out, &reservation);
    }
    writeln!(
        out,
        "Reservation {} confirmed: {} in {} from {} to {}",
        reservation.id,
        reservation.guest_name(),
        reservation.unit.name,
        reservation.start_date,
        reservation.end_date
    )?;
    Ok(())
}

fn guest_confirmation(r: &Reservation) -> MailData {
    MailData {
        to: r.email.clone(),
        from: FRONT_DESK.to_string(),
        subject: "Reservation Confirmation".to_string(),
        content: format!(
            "Dear {},\n\nThis is to confirm your reservation in the {} from {} to {}.\n",
            r.first_name, r.unit.name, r.start_date, r.end_date
        ),
    }
}

fn owner_notice(r: &Reservation) -> MailData {
    MailData {
        to: OWNER.to_string(),
        from: FRONT_DESK.to_string(),
        subject: "Reservation Notification".to_string(),
        content: format!(
            "A reservation has been made for {} from {} to {} by {} <{}>.\n",
            r.unit.name,
            r.start_date,
            r.end_date,
            r.guest_name(),
            r.email
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::CliError;
    use crate::notify::Mailer;

    #[tokio::test]
    async fn test_book_queues_guest_and_owner_mail() {
        let repo = repo().await;
        let (mailer, listener) = Mailer::spawn(8);
        {
            let ctx = Context {
                repo: &repo,
                mailer: &mailer,
                json: false,
            };
            let mut out = Vec::new();
            book(&ctx, &book_args(2, 1, 5), &mut out).await.unwrap();

            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("Jane Doe in Major's Suite from 2024-01-01 to 2024-01-05"));
        }
        drop(mailer);

        assert_eq!(listener.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_taken_dates_report_unavailable() {
        let repo = repo().await;
        let (mailer, listener) = Mailer::spawn(8);
        {
            let ctx = Context {
                repo: &repo,
                mailer: &mailer,
                json: false,
            };
            book(&ctx, &book_args(1, 1, 5), &mut Vec::new()).await.unwrap();

            let err = book(&ctx, &book_args(1, 4, 6), &mut Vec::new()).await.unwrap_err();
            assert!(matches!(err, CliError::Unavailable { unit_id: 1, .. }));
            assert_eq!(err.exit_code(), 3);
        }
        drop(mailer);

        // Only the first booking sent mail.
        assert_eq!(listener.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_unit_not_found() {
        let repo = repo().await;
        let (mailer, _listener) = Mailer::spawn(8);
        let ctx = Context {
            repo: &repo,
            mailer: &mailer,
            json: false,
        };

        let err = book(&ctx, &book_args(77, 1, 5), &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_guest_confirmation_addressed_to_guest() {
        let reservation = Reservation {
            id: 1,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
            start_date: jan(1),
            end_date: jan(5),
            unit_id: 2,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            processed: false,
            unit: innkeep_core::UnitRef {
                id: 2,
                name: "Major's Suite".to_string(),
            },
        };

        let mail = guest_confirmation(&reservation);
        assert_eq!(mail.to, "jane@example.com");
        assert!(mail.content.contains("Major's Suite from 2024-01-01 to 2024-01-05"));
        assert_eq!(owner_notice(&reservation).to, OWNER);
    }
}
