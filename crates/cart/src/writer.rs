//! Single-writer persistence queue.
//!
//! Every state change publishes a snapshot tagged with a generation number.
//! One background task owns the store and writes snapshots one at a time.
//! Snapshots published while a write is in flight collapse into the newest
//! one, so storage always converges on the latest in-memory state and never
//! on an older one.

use std::sync::Arc;

use go_market_core::CartItem;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{CartError, Result, StorageError};
use crate::storage::KeyValueStore;

/// A cart state queued for writing.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    generation: u64,
    items: Vec<CartItem>,
}

/// Outcome of the most recent write.
#[derive(Debug, Clone, Default)]
struct WriteReport {
    generation: u64,
    error: Option<Arc<StorageError>>,
}

impl WriteReport {
    fn outcome(&self) -> Result<()> {
        match &self.error {
            Some(e) => Err(CartError::Persist(Arc::clone(e))),
            None => Ok(()),
        }
    }
}

/// Read side of the write reports, usable after the writer has stopped.
#[derive(Debug, Clone)]
pub struct WriteOutcomes {
    reports: watch::Receiver<WriteReport>,
}

impl WriteOutcomes {
    /// Outcome of the most recent write, `Ok` if nothing was written.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Persist` if that write failed.
    pub fn latest(&self) -> Result<()> {
        self.reports.borrow().outcome()
    }
}

/// Producer side of the persistence queue.
#[derive(Debug)]
pub struct PersistenceWriter {
    snapshots: watch::Sender<Snapshot>,
    reports: watch::Receiver<WriteReport>,
}

impl PersistenceWriter {
    /// Start the writer task for `key` on `store`.
    ///
    /// Generation zero is the hydrated state, which is already in storage and
    /// is never written back.
    pub fn spawn<S: KeyValueStore>(store: S, key: String) -> (Self, JoinHandle<()>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::default());
        let (report_tx, report_rx) = watch::channel(WriteReport::default());

        let task = tokio::spawn(run(store, key, snapshot_rx, report_tx));

        (
            Self {
                snapshots: snapshot_tx,
                reports: report_rx,
            },
            task,
        )
    }

    /// Queue `items` for writing and return the generation assigned to them.
    ///
    /// Callers hold the cart state lock while publishing, so generations follow
    /// mutation order.
    pub fn publish(&self, items: Vec<CartItem>) -> u64 {
        let mut generation = 0;
        self.snapshots.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.items = items;
            generation = snapshot.generation;
        });
        debug!(generation, "Queued cart snapshot");
        generation
    }

    fn generation(&self) -> u64 {
        self.snapshots.borrow().generation
    }

    /// Outcomes of past and future writes.
    #[must_use]
    pub fn outcomes(&self) -> WriteOutcomes {
        WriteOutcomes {
            reports: self.reports.clone(),
        }
    }

    /// Wait until the newest snapshot published so far has been written.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Persist` if the write that settled the wait failed,
    /// and `CartError::WriterStopped` if the writer task has exited.
    pub async fn flush(&self) -> Result<()> {
        let target = self.generation();
        let mut reports = self.reports.clone();
        let report = reports
            .wait_for(|report| report.generation >= target)
            .await
            .map_err(|_| CartError::WriterStopped)?;
        report.outcome()
    }
}

async fn run<S: KeyValueStore>(
    store: S,
    key: String,
    mut snapshots: watch::Receiver<Snapshot>,
    reports: watch::Sender<WriteReport>,
) {
    debug!(key = %key, "Persistence writer started");

    while snapshots.changed().await.is_ok() {
        let (generation, encoded) = {
            let snapshot = snapshots.borrow_and_update();
            (snapshot.generation, serde_json::to_string(&snapshot.items))
        };

        let result = match encoded {
            Ok(json) => store.set(&key, json).await,
            Err(e) => Err(StorageError::from(e)),
        };

        let error = match result {
            Ok(()) => {
                debug!(generation, "Cart snapshot persisted");
                None
            }
            Err(e) => {
                error!(generation, error = %e, "Failed to persist cart snapshot");
                Some(Arc::new(e))
            }
        };

        reports.send_replace(WriteReport { generation, error });
    }

    info!(key = %key, "Persistence writer stopped");
}
