use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, KanriError>;

#[derive(Debug, Error)]
pub enum KanriError {
    #[error("Board not found: {0}")]
    BoardNotFound(Uuid),

    #[error("Column not found: {0}")]
    ColumnNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Snapshot file {} is unreadable or corrupt: {source}", path.display())]
    SnapshotCorrupt {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl KanriError {
    /// Builds a field-scoped validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// True for user-correctable rejections, as opposed to hard failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
