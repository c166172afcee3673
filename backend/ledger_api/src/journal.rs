//! Background task that appends ledger events to the SQLite journal.
//!
//! [`Journal`] is the ledger's [`EventSink`]: the ledger queues each event
//! while it still holds the project lock, so journal rows for one project
//! follow the order the ledger applied the changes. The writer task drains the
//! channel in order; a full channel drops the event rather than stall a
//! request.

use art_restoration::events::EventSink;
use art_restoration::LedgerEvent;
use sqlx::SqlitePool;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::db;

#[derive(Clone, Debug)]
pub struct Journal {
    tx: mpsc::Sender<LedgerEvent>,
}

impl Journal {
    /// Spawn the writer task and return the handle used to feed it.
    pub fn spawn(pool: SqlitePool, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(run(pool, rx));
        (Self { tx }, handle)
    }
}

impl EventSink for Journal {
    /// Queue `event` without waiting.
    fn record(&self, event: LedgerEvent) {
        let (event, reason) = match self.tx.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => (event, "full"),
            Err(TrySendError::Closed(event)) => (event, "closed"),
        };
        warn!(
            kind = event.kind(),
            project_id = event.project_id(),
            "Journal {reason}, event dropped"
        );
    }
}

/// Write events until every [`Journal`] handle is dropped.
async fn run(pool: SqlitePool, mut rx: mpsc::Receiver<LedgerEvent>) {
    info!("Journal writer starting");
    while let Some(event) = rx.recv().await {
        match db::insert_event(&pool, &event).await {
            Ok(()) => debug!(
                kind = event.kind(),
                project_id = event.project_id(),
                "Journaled event"
            ),
            Err(e) => error!("Journal write error: {e}"),
        }
    }
    info!("Journal writer stopped");
}
