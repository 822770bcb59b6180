//! Persistence contract for combat session snapshots.

use async_trait::async_trait;
use combat_core::SessionSnapshot;
use thiserror::Error;

/// Errors surfaced by snapshot repositories.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot at {location} is corrupt: {detail}")]
    Corrupt { location: String, detail: String },
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Repository for session snapshots indexed by revision.
///
/// A revision is the engine's action nonce at capture time, so saves are
/// naturally monotonic: `latest()` resumes from the highest nonce that made
/// it to the store.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Saves a snapshot under a revision, replacing any previous one.
    async fn save(&self, revision: u64, snapshot: &SessionSnapshot) -> Result<()>;

    /// Loads the snapshot at a revision, if present.
    async fn load(&self, revision: u64) -> Result<Option<SessionSnapshot>>;

    /// Loads the highest saved revision.
    async fn latest(&self) -> Result<Option<(u64, SessionSnapshot)>> {
        match self.list_revisions().await?.last() {
            Some(&revision) => Ok(self.load(revision).await?.map(|s| (revision, s))),
            None => Ok(None),
        }
    }

    /// Whether a revision exists in the store.
    async fn exists(&self, revision: u64) -> bool;

    /// Deletes the snapshot at a revision; absent revisions are fine.
    async fn delete(&self, revision: u64) -> Result<()>;

    /// All saved revisions, ascending.
    async fn list_revisions(&self) -> Result<Vec<u64>>;
}
