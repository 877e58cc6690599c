#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{ObjectSigner, Storage, StorageResult};
use filegate_core::Config;
use std::sync::Arc;

/// Create the URL signer and storage backend from configuration.
///
/// Both handles share one underlying client.
#[cfg(feature = "storage-s3")]
pub fn create_storage(config: &Config) -> StorageResult<(Arc<dyn ObjectSigner>, Arc<dyn Storage>)> {
    let storage = Arc::new(S3Storage::new(
        config.s3_bucket().to_string(),
        config.s3_region().to_string(),
        config.s3_endpoint().map(String::from),
        config.s3_access_key_id().to_string(),
        config.s3_secret_access_key().to_string(),
    )?);

    tracing::info!(
        bucket = %config.s3_bucket(),
        region = %config.s3_region(),
        endpoint = ?config.s3_endpoint(),
        "S3 storage initialized"
    );

    let signer: Arc<dyn ObjectSigner> = storage.clone();
    Ok((signer, storage))
}

#[cfg(not(feature = "storage-s3"))]
pub fn create_storage(_config: &Config) -> StorageResult<(Arc<dyn ObjectSigner>, Arc<dyn Storage>)> {
    Err(crate::StorageError::ConfigError(
        "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
    ))
}
