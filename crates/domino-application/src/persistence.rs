//! Ordered, fire-and-forget persistence.
//!
//! The controller never waits on storage while scoring. Writes are queued to
//! a single worker task that owns the store handle, so they reach storage in
//! the order they were issued.

use domino_core::{GameSession, HistoryEntry, SessionStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};

enum PersistCommand {
    SaveActive(GameSession),
    ClearActive,
    AppendHistory(HistoryEntry),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background persistence worker.
pub struct PersistenceQueue {
    sender: mpsc::UnboundedSender<PersistCommand>,
    failures: Arc<AtomicUsize>,
}

impl PersistenceQueue {
    /// Spawns the worker on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(store: Arc<dyn SessionStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let failures = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_worker(store, receiver, failures.clone()));
        Self { sender, failures }
    }

    pub fn save_active(&self, session: GameSession) {
        self.send(PersistCommand::SaveActive(session));
    }

    pub fn clear_active(&self) {
        self.send(PersistCommand::ClearActive);
    }

    pub fn append_history(&self, entry: HistoryEntry) {
        self.send(PersistCommand::AppendHistory(entry));
    }

    /// Waits until every command queued so far has been handled.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.send(PersistCommand::Flush(done));
        let _ = wait.await;
    }

    /// Number of writes that failed since the queue was created.
    pub fn failed_writes(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    fn send(&self, command: PersistCommand) {
        if self.sender.send(command).is_err() {
            tracing::error!("Persistence worker stopped; write dropped");
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

async fn run_worker(
    store: Arc<dyn SessionStore>,
    mut receiver: mpsc::UnboundedReceiver<PersistCommand>,
    failures: Arc<AtomicUsize>,
) {
    while let Some(command) = receiver.recv().await {
        let result = match command {
            PersistCommand::SaveActive(session) => store
                .save_active(&session)
                .await
                .map_err(|e| ("save active session", e)),
            PersistCommand::ClearActive => store
                .clear_active()
                .await
                .map_err(|e| ("clear active session", e)),
            PersistCommand::AppendHistory(entry) => store
                .append_history(&entry)
                .await
                .map_err(|e| ("append history", e)),
            PersistCommand::Flush(done) => {
                let _ = done.send(());
                Ok(())
            }
        };

        if let Err((operation, e)) = result {
            failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to {}: {}", operation, e);
        }
    }
    tracing::debug!("Persistence worker finished");
}
