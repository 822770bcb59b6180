//! Autosave worker persisting committed state on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use combat_core::SessionSnapshot;

use crate::api::{Result, RuntimeError};
use crate::repository::StateRepository;

use super::session::Command;

/// Background task that observes committed revisions and saves snapshots.
///
/// The worker never touches the session loop directly: it watches the
/// revision channel, and when a tick finds new work it queries a state clone
/// through the ordinary command channel and writes it to the repository.
/// Failed saves are logged and retried on the next tick.
pub struct AutosaveWorker {
    command_tx: mpsc::Sender<Command>,
    repository: Arc<dyn StateRepository>,
    interval: Duration,
    revision_rx: watch::Receiver<u64>,
    stop_rx: oneshot::Receiver<()>,
    last_saved: u64,
}

impl AutosaveWorker {
    pub fn new(
        command_tx: mpsc::Sender<Command>,
        repository: Arc<dyn StateRepository>,
        interval: Duration,
        revision_rx: watch::Receiver<u64>,
        stop_rx: oneshot::Receiver<()>,
    ) -> Self {
        // The boot revision is already durable (or an empty session not
        // worth saving); only later commits trigger writes.
        let last_saved = *revision_rx.borrow();
        Self {
            command_tx,
            repository,
            interval,
            revision_rx,
            stop_rx,
            last_saved,
        }
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately; skip it so
        // boot state is not re-saved.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.command_tx.is_closed() {
                        break;
                    }
                    self.save_if_dirty().await;
                }
                _ = &mut self.stop_rx => {
                    // Final flush so shutdown never loses a committed
                    // revision.
                    self.save_if_dirty().await;
                    break;
                }
            }
        }
        debug!(target: "runtime::autosave", "autosave worker stopping");
    }

    async fn save_if_dirty(&mut self) {
        let revision = *self.revision_rx.borrow_and_update();
        if revision == self.last_saved {
            return;
        }

        match self.persist().await {
            Ok(saved) => {
                self.last_saved = saved;
                debug!(target: "runtime::autosave", revision = saved, "autosaved session");
            }
            Err(error) => {
                warn!(
                    target: "runtime::autosave",
                    revision,
                    error = %error,
                    "autosave failed; will retry next tick"
                );
            }
        }
    }

    /// Queries the live state and writes it; returns the revision saved.
    ///
    /// The snapshot is keyed by its own action nonce, which may already be
    /// ahead of the revision that woke us. That is fine: the newer save
    /// covers the older one.
    async fn persist(&self) -> Result<u64> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        let state = reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?;

        let revision = state.action_nonce;
        let snapshot = SessionSnapshot::capture(&state);
        self.repository.save(revision, &snapshot).await?;
        Ok(revision)
    }
}
