//! # Kanri Core
//!
//! Core mutation engine and domain models for Kanri kanban board
//! management.
//!
//! This crate provides the board/column/card schema, the validation
//! rules, and the mutation operations over a single persisted snapshot,
//! without any dependency on specific UI implementations or transport
//! layers. Every mutation loads the full snapshot, validates, mutates in
//! memory, and persists the full snapshot back; dependents are told what
//! went stale through [`Invalidation`] events.

pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use domain::{Board, Card, Column, Snapshot};
pub use engine::{Engine, Invalidation};
pub use error::{KanriError, Result};
#[cfg(feature = "file-storage")]
pub use storage::file_storage::FileStorage;
pub use storage::SnapshotStore;
