use crate::{domain::Snapshot, error::Result};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// Storage trait for persisting the board snapshot
///
/// The snapshot is the unit of durability: implementations load and save
/// the whole document and make no consistency decisions of their own.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the current snapshot.
    ///
    /// When no snapshot has been persisted yet, implementations must
    /// initialize an empty one, persist it, and return it — callers never
    /// see a missing snapshot.
    async fn load(&self) -> Result<Snapshot>;

    /// Persists the full snapshot, overwriting the previous one.
    ///
    /// Failures must propagate: a swallowed write error would leave the
    /// operation's effects unobserved by every future load.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
