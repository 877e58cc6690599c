//! Recording fakes for the object store signer, object storage and identity provider.

use async_trait::async_trait;
use filegate_api::auth::models::TenantContext;
use filegate_api::auth::IdentityResolver;
use filegate_core::models::UserRole;
use filegate_core::AppError;
use filegate_storage::{ObjectSigner, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::auth::{tenant_a_user, tenant_b_user, NO_TENANT_TOKEN};

#[derive(Debug, Clone, PartialEq)]
pub struct SignedPut {
    pub storage_key: String,
    pub content_type: String,
    pub content_length: u64,
    pub expires_in: Duration,
}

/// Deterministic signer. URLs look like `https://storage.test/{bucket}/{key}?X-Amz-Expires=N`.
pub struct RecordingSigner {
    bucket: String,
    puts: Mutex<Vec<SignedPut>>,
    fail: AtomicBool,
}

impl RecordingSigner {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            puts: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_signing(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn puts(&self) -> Vec<SignedPut> {
        self.puts.lock().unwrap().clone()
    }

    fn url(&self, method: &str, key: &str, expires_in: Duration) -> StorageResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("credentials rejected".to_string()));
        }
        Ok(format!(
            "https://storage.test/{}/{}?X-Amz-Expires={}&method={}",
            self.bucket,
            key,
            expires_in.as_secs(),
            method
        ))
    }
}

#[async_trait]
impl ObjectSigner for RecordingSigner {
    async fn sign_put(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: u64,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let url = self.url("PUT", storage_key, expires_in)?;
        self.puts.lock().unwrap().push(SignedPut {
            storage_key: storage_key.to_string(),
            content_type: content_type.to_string(),
            content_length,
            expires_in,
        });
        Ok(url)
    }

    async fn sign_get(&self, storage_key: &str, expires_in: Duration) -> StorageResult<String> {
        self.url("GET", storage_key, expires_in)
    }
}

/// Records every delete attempt, optionally failing all of them.
#[derive(Default)]
pub struct RecordingStorage {
    deletes: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingStorage {
    pub fn fail_deletes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deletes.lock().unwrap().push(storage_key.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("bucket unreachable".to_string()));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// Token table standing in for the identity provider and membership lookup.
pub struct StaticIdentityResolver {
    users: HashMap<String, TenantContext>,
}

impl StaticIdentityResolver {
    pub fn with_test_users() -> Self {
        let users = [tenant_a_user(), tenant_b_user()]
            .into_iter()
            .map(|u| {
                (
                    u.token.clone(),
                    TenantContext {
                        tenant_id: u.tenant_id,
                        user_id: u.user_id,
                        role: UserRole::Member,
                    },
                )
            })
            .collect();
        Self { users }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<TenantContext, AppError> {
        if token == NO_TENANT_TOKEN {
            return Err(AppError::Forbidden("User has no tenant access".to_string()));
        }
        self.users
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("Invalid token".to_string()))
    }
}
