//! # Mail Queue
//!
//! Confirmation mail is handed to a background listener over a bounded
//! channel. Enqueueing never blocks and never fails a booking; a full or
//! closed queue is logged and the message dropped.
//!
//! ```text
//! book ──► Mailer::send ──try_send──► [ mpsc (bounded) ] ──► listener task
//!                │                                               │
//!                └── Full / Closed → warn!, dropped              └── dispatch (log)
//! ```

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// An outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailData {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub content: String,
}

/// Sending half of the mail queue.
#[derive(Debug, Clone)]
pub struct Mailer {
    tx: mpsc::Sender<MailData>,
}

impl Mailer {
    /// Creates the queue and spawns its listener.
    ///
    /// The listener exits once every `Mailer` clone is dropped and the
    /// queue is drained; await the handle to flush on shutdown.
    pub fn spawn(capacity: usize) -> (Mailer, JoinHandle<usize>) {
        let (tx, mut rx) = mpsc::channel::<MailData>(capacity);

        let listener = tokio::spawn(async move {
            let mut dispatched = 0;
            while let Some(mail) = rx.recv().await {
                dispatch(&mail);
                dispatched += 1;
            }
            dispatched
        });

        (Mailer { tx }, listener)
    }

    /// Queues a message. Returns `false` if it was dropped.
    pub fn send(&self, mail: MailData) -> bool {
        match self.tx.try_send(mail) {
            Ok(()) => true,
            Err(TrySendError::Full(mail)) => {
                warn!(to = %mail.to, subject = %mail.subject, "Mail queue full, message dropped");
                false
            }
            Err(TrySendError::Closed(mail)) => {
                warn!(to = %mail.to, subject = %mail.subject, "Mail queue closed, message dropped");
                false
            }
        }
    }
}

fn dispatch(mail: &MailData) {
    info!(to = %mail.to, from = %mail.from, subject = %mail.subject, "Mail dispatched");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail(to: &str) -> MailData {
        MailData {
            to: to.to_string(),
            from: "front-desk@innkeep.local".to_string(),
            subject: "Reservation confirmation".to_string(),
            content: "See you soon".to_string(),
        }
    }

    #[tokio::test]
    async fn test_listener_drains_queue_on_shutdown() {
        let (mailer, listener) = Mailer::spawn(4);
        assert!(mailer.send(mail("a@example.com")));
        assert!(mailer.send(mail("b@example.com")));
        drop(mailer);

        assert_eq!(listener.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        // Current-thread runtime: the listener cannot run until we yield.
        let (mailer, listener) = Mailer::spawn(1);
        assert!(mailer.send(mail("a@example.com")));
        assert!(!mailer.send(mail("b@example.com")));
        drop(mailer);

        assert_eq!(listener.await.unwrap(), 1);
    }
}
