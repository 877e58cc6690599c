use crate::traits::{check_key, ObjectSigner, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{ObjectStoreExt, Result as ObjectResult};
use std::time::Duration;

/// S3-compatible storage (AWS S3, Cloudflare R2, MinIO)
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `region` - Region identifier (`auto` for R2)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g. "https://<account>.r2.cloudflarestorage.com", "http://localhost:9000")
    /// * `access_key_id`, `secret_access_key` - Signing credential
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        access_key_id: String,
        secret_access_key: String,
    ) -> StorageResult<Self> {
        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return Err(StorageError::SigningFailed(
                "S3 access key id and secret access key are required".to_string(),
            ));
        }

        let mut builder = AmazonS3Builder::new()
            .with_region(region)
            .with_bucket_name(bucket.clone())
            .with_access_key_id(access_key_id)
            .with_secret_access_key(secret_access_key);

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    async fn sign(&self, method: Method, storage_key: &str, expires_in: Duration) -> StorageResult<String> {
        check_key(storage_key)?;
        let location = Path::from(storage_key.to_string());
        let url_result: ObjectResult<_> = self.store.signed_url(method, &location, expires_in).await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 URL signing failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }
}

#[async_trait]
impl ObjectSigner for S3Storage {
    async fn sign_put(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: u64,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let url = self.sign(Method::PUT, storage_key, expires_in).await?;
        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            content_length = content_length,
            expires_in_secs = expires_in.as_secs(),
            "Signed S3 PUT URL"
        );
        Ok(url)
    }

    async fn sign_get(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String> {
        let url = self.sign(Method::GET, storage_key, expires_in).await?;
        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            expires_in_secs = expires_in.as_secs(),
            "Signed S3 GET URL"
        );
        Ok(url)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        check_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
