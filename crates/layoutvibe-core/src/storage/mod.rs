//! Storage abstraction for saved layouts.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::format::SavedLayout;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Key the editor saves its working layout under.
pub const DEFAULT_LAYOUT_KEY: &str = "layoutVibeData";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Layout not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for layout storage backends.
///
/// Loading data that no longer parses removes it from the backend and
/// reports [`StorageError::Serialization`].
pub trait Storage: Send + Sync {
    /// Save a layout under `key`.
    fn save(&self, key: &str, layout: &SavedLayout) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the layout saved under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<SavedLayout>>;

    /// Delete a saved layout.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all keys.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a layout exists.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
