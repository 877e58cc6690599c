//! Storage setup and initialization

use anyhow::{Context, Result};
use filegate_core::Config;
use filegate_storage::{create_storage, ObjectSigner, Storage};
use std::sync::Arc;

pub fn setup_storage(config: &Config) -> Result<(Arc<dyn ObjectSigner>, Arc<dyn Storage>)> {
    tracing::info!("Initializing object storage...");
    let (signer, storage) = create_storage(config).context("Failed to initialize storage")?;
    tracing::info!(
        backend = storage.backend_name(),
        bucket = %config.s3_bucket(),
        endpoint = ?config.s3_endpoint(),
        "Object storage initialized"
    );
    Ok((signer, storage))
}
