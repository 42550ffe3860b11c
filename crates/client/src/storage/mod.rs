//! Local key-value persistence.
//!
//! Values are opaque strings; callers serialize. The keys used by the client
//! are fixed and listed in [`keys`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Storage keys written by the client.
pub mod keys {
    /// Session bearer token.
    pub const TOKEN: &str = "token";
    /// JSON-serialized cached user.
    pub const USER: &str = "user";
    /// `light` or `dark`.
    pub const THEME: &str = "theme";
    /// `true` or `false`.
    pub const BACKGROUND_ANIMATION: &str = "backgroundAnimation";
}

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Corrupt value under {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// Async string store keyed by short names.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
