//! Storage abstraction traits
//!
//! `ObjectSigner` issues presigned URLs and never touches the file registry.
//! `Storage` covers the direct object operations the API still performs itself.

use async_trait::async_trait;
use filegate_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SigningFailed(msg) | StorageError::ConfigError(msg) => {
                AppError::Signing(msg)
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Presigned URL issuer
///
/// Signing is computed locally from a fixed credential: implementations perform
/// no network I/O. Expiry is enforced by the storage backend, not here.
#[async_trait]
pub trait ObjectSigner: Send + Sync {
    /// Presigned PUT URL for a direct client upload to `storage_key`.
    ///
    /// `content_type` and `content_length` describe the declared object; backends
    /// that cannot bind them into the signature ignore them.
    async fn sign_put(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: u64,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Presigned GET URL for `storage_key`.
    async fn sign_get(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String>;
}

/// Direct object operations against the backend
#[async_trait]
pub trait Storage: Send + Sync {
    /// Delete an object by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Backend name used in logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Reject keys that could escape the tenant prefix
pub(crate) fn check_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.starts_with('/') || storage_key.contains("..") {
        return Err(StorageError::InvalidKey(storage_key.to_string()));
    }
    Ok(())
}
