//! High-level runtime orchestrator.
//!
//! The runtime owns background workers, wires up command/event channels, and
//! exposes a builder-based API for hosts to drive combat sessions.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::info;

use combat_core::CombatState;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::{CombatEvent, EventBus, Topic};
use crate::notify::{NotificationSink, TracingSink};
use crate::oracle::OracleManager;
use crate::repository::StateRepository;
use crate::workers::{AutosaveWorker, Command, SessionWorker};

/// Main runtime hosting one combat session.
///
/// The runtime owns the workers; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    session_worker: JoinHandle<()>,
    autosave_worker: Option<JoinHandle<()>>,
    autosave_stop: Option<oneshot::Sender<()>>,
}

impl Runtime {
    /// Create a new runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.handle.subscribe(topic)
    }

    /// Shut down the runtime gracefully.
    ///
    /// The autosave worker flushes one final snapshot before the session
    /// worker is released.
    pub async fn shutdown(self) -> Result<()> {
        if let Some(stop) = self.autosave_stop {
            let _ = stop.send(());
        }
        if let Some(worker) = self.autosave_worker {
            worker.await.map_err(RuntimeError::WorkerJoin)?;
        }

        drop(self.handle);
        self.session_worker.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    initial_state: Option<CombatState>,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn StateRepository>>,
    notifier: Option<Arc<dyn NotificationSink>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            initial_state: None,
            oracles: None,
            repository: None,
            notifier: None,
        }
    }

    /// Override runtime configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from an explicit state instead of the repository or a fresh
    /// session.
    pub fn initial_state(mut self, state: CombatState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Use a pre-populated oracle manager.
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Enable persistence: resume from the latest snapshot at boot and run
    /// the autosave worker.
    pub fn repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Route initiative notifications somewhere other than the log.
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the runtime and spawn its workers.
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.unwrap_or_default();
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingSink) as Arc<dyn NotificationSink>);

        let initial_state = match self.initial_state {
            Some(state) => state,
            None => match &self.repository {
                Some(repository) => match repository.latest().await? {
                    Some((revision, snapshot)) => {
                        info!(
                            target: "runtime",
                            revision,
                            "resuming session from latest snapshot"
                        );
                        snapshot.restore()
                    }
                    None => fresh_state(&self.config),
                },
                None => fresh_state(&self.config),
            },
        };

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let (revision_tx, revision_rx) = watch::channel(initial_state.action_nonce);
        let event_bus = EventBus::with_capacity(self.config.event_capacity);

        let handle = RuntimeHandle::new(command_tx.clone(), event_bus.clone());

        let session_worker = SessionWorker::new(
            initial_state,
            oracles,
            command_rx,
            event_bus,
            notifier,
            revision_tx,
        );
        let session_worker = tokio::spawn(async move {
            session_worker.run().await;
        });

        let (autosave_worker, autosave_stop) = match self.repository {
            Some(repository) => {
                let (stop_tx, stop_rx) = oneshot::channel();
                let autosave = AutosaveWorker::new(
                    command_tx,
                    repository,
                    self.config.autosave_interval,
                    revision_rx,
                    stop_rx,
                );
                let worker = tokio::spawn(async move {
                    autosave.run().await;
                });
                (Some(worker), Some(stop_tx))
            }
            None => (None, None),
        };

        Ok(Runtime {
            handle,
            session_worker,
            autosave_worker,
            autosave_stop,
        })
    }
}

fn fresh_state(config: &RuntimeConfig) -> CombatState {
    let seed = config.session_seed.unwrap_or_else(rand::random);
    CombatState::with_seed(seed)
}
