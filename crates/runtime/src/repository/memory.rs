//! In-memory StateRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use combat_core::SessionSnapshot;

use super::traits::{PersistenceError, Result, StateRepository};

/// Keeps snapshots in a revision-ordered map.
pub struct InMemoryStateRepository {
    snapshots: RwLock<BTreeMap<u64, SessionSnapshot>>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(BTreeMap::new()),
        }
    }

    /// Pre-seeds the store, for tests that start from a saved session.
    pub fn with_snapshot(revision: u64, snapshot: SessionSnapshot) -> Self {
        let mut snapshots = BTreeMap::new();
        snapshots.insert(revision, snapshot);
        Self {
            snapshots: RwLock::new(snapshots),
        }
    }
}

impl Default for InMemoryStateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn save(&self, revision: u64, snapshot: &SessionSnapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        snapshots.insert(revision, snapshot.clone());
        Ok(())
    }

    async fn load(&self, revision: u64) -> Result<Option<SessionSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(snapshots.get(&revision).cloned())
    }

    async fn latest(&self) -> Result<Option<(u64, SessionSnapshot)>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(snapshots
            .last_key_value()
            .map(|(revision, snapshot)| (*revision, snapshot.clone())))
    }

    async fn exists(&self, revision: u64) -> bool {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.contains_key(&revision))
            .unwrap_or(false)
    }

    async fn delete(&self, revision: u64) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        snapshots.remove(&revision);
        Ok(())
    }

    async fn list_revisions(&self) -> Result<Vec<u64>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(snapshots.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CombatState;

    #[tokio::test]
    async fn stores_and_orders_revisions() {
        let repo = InMemoryStateRepository::new();
        let snapshot = SessionSnapshot::capture(&CombatState::with_seed(1));

        repo.save(5, &snapshot).await.unwrap();
        repo.save(2, &snapshot).await.unwrap();

        assert_eq!(repo.list_revisions().await.unwrap(), vec![2, 5]);
        assert_eq!(repo.latest().await.unwrap().unwrap().0, 5);
        assert!(repo.exists(2).await);

        repo.delete(2).await.unwrap();
        assert!(!repo.exists(2).await);
        assert!(repo.load(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn with_snapshot_seeds_the_store() {
        let snapshot = SessionSnapshot::capture(&CombatState::with_seed(3));
        let repo = InMemoryStateRepository::with_snapshot(9, snapshot.clone());

        let (revision, loaded) = repo.latest().await.unwrap().unwrap();
        assert_eq!(revision, 9);
        assert_eq!(loaded, snapshot);
    }
}
