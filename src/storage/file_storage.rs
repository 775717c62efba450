use crate::{
    domain::Snapshot,
    error::{KanriError, Result},
    storage::SnapshotStore,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based snapshot storage
///
/// Keeps the whole board collection as one pretty-printed JSON document.
/// Saves go through a sibling temp file and a rename, so a crashed write
/// never leaves a half-written snapshot behind.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const KANRI_DIR: &'static str = ".kanri";
    const SNAPSHOT_FILE: &'static str = "boards.json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::KANRI_DIR),
        }
    }

    fn snapshot_file(&self) -> PathBuf {
        self.root_path.join(Self::SNAPSHOT_FILE)
    }

    fn temp_file(&self) -> PathBuf {
        self.root_path.join(format!("{}.tmp", Self::SNAPSHOT_FILE))
    }

    async fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for FileStorage {
    async fn load(&self) -> Result<Snapshot> {
        let snapshot_file = self.snapshot_file();

        if !snapshot_file.exists() {
            // First load: persist an empty snapshot before handing it out,
            // so a subsequent load observes the same state.
            tracing::debug!(path = %snapshot_file.display(), "initializing empty snapshot");
            let snapshot = Snapshot::new();
            self.save(&snapshot).await?;
            return Ok(snapshot);
        }

        // The file exists: any failure from here on is corruption, not
        // absence, and must not be papered over by reinitializing.
        let contents = fs::read_to_string(&snapshot_file).await.map_err(|e| {
            KanriError::SnapshotCorrupt {
                path: snapshot_file.clone(),
                source: Box::new(e),
            }
        })?;

        let snapshot: Snapshot =
            serde_json::from_str(&contents).map_err(|e| KanriError::SnapshotCorrupt {
                path: snapshot_file.clone(),
                source: Box::new(e),
            })?;

        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_directory_exists().await?;

        let json = serde_json::to_string_pretty(snapshot)?;
        let temp_file = self.temp_file();

        fs::write(&temp_file, json).await?;
        fs::rename(&temp_file, self.snapshot_file()).await?;

        Ok(())
    }
}
