//! File-based StateRepository implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use combat_core::SessionSnapshot;
use tokio::fs;

use super::traits::{PersistenceError, Result, StateRepository};

/// Stores each revision as one pretty-printed JSON file.
///
/// Snapshots are written to `session_{revision}.json.tmp` and renamed into
/// place, so a crash mid-write never leaves a truncated snapshot behind.
/// JSON keeps the files hand-inspectable when debugging a session.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    /// Creates the repository, making the directory if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn snapshot_path(&self, revision: u64) -> PathBuf {
        self.base_dir.join(format!("session_{revision}.json"))
    }
}

#[async_trait]
impl StateRepository for FileStateRepository {
    async fn save(&self, revision: u64, snapshot: &SessionSnapshot) -> Result<()> {
        let path = self.snapshot_path(revision);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(snapshot).map_err(PersistenceError::Encode)?;

        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(
            target: "runtime::repository",
            revision,
            path = %path.display(),
            "saved snapshot"
        );
        Ok(())
    }

    async fn load(&self, revision: u64) -> Result<Option<SessionSnapshot>> {
        let path = self.snapshot_path(revision);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let snapshot =
            serde_json::from_slice(&bytes).map_err(|error| PersistenceError::Corrupt {
                location: path.display().to_string(),
                detail: error.to_string(),
            })?;
        Ok(Some(snapshot))
    }

    async fn exists(&self, revision: u64) -> bool {
        self.snapshot_path(revision).exists()
    }

    async fn delete(&self, revision: u64) -> Result<()> {
        let path = self.snapshot_path(revision);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    async fn list_revisions(&self) -> Result<Vec<u64>> {
        let mut revisions = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(revision) = name
                .to_str()
                .and_then(|n| n.strip_prefix("session_"))
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<u64>().ok())
            {
                revisions.push(revision);
            }
        }

        revisions.sort_unstable();
        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CombatState;

    fn snapshot_with_round(round: u32) -> SessionSnapshot {
        let mut state = CombatState::with_seed(9);
        state.is_in_combat = true;
        state.round = round;
        SessionSnapshot::capture(&state)
    }

    #[tokio::test]
    async fn save_load_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path()).unwrap();
        let snapshot = snapshot_with_round(3);

        repo.save(7, &snapshot).await.unwrap();
        assert!(repo.exists(7).await);

        let loaded = repo.load(7).await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(repo.load(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_picks_the_highest_revision() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path()).unwrap();

        repo.save(2, &snapshot_with_round(1)).await.unwrap();
        repo.save(10, &snapshot_with_round(4)).await.unwrap();
        repo.save(5, &snapshot_with_round(2)).await.unwrap();

        assert_eq!(repo.list_revisions().await.unwrap(), vec![2, 5, 10]);
        let (revision, snapshot) = repo.latest().await.unwrap().unwrap();
        assert_eq!(revision, 10);
        assert_eq!(snapshot.round, 4);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path()).unwrap();

        repo.save(1, &snapshot_with_round(1)).await.unwrap();
        repo.delete(1).await.unwrap();
        repo.delete(1).await.unwrap();
        assert!(!repo.exists(1).await);
    }

    #[tokio::test]
    async fn corrupt_files_surface_as_corrupt_not_io() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path()).unwrap();

        std::fs::write(dir.path().join("session_3.json"), b"{not json").unwrap();

        let error = repo.load(3).await.unwrap_err();
        assert!(matches!(error, PersistenceError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn unrelated_files_are_ignored_when_listing() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::new(dir.path()).unwrap();

        repo.save(4, &snapshot_with_round(1)).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"scratch").unwrap();
        std::fs::write(dir.path().join("session_x.json"), b"{}").unwrap();

        assert_eq!(repo.list_revisions().await.unwrap(), vec![4]);
    }
}
