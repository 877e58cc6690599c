//! Application state.
//!
//! Every external collaborator is held behind a trait object so tests can
//! substitute fakes. The state is immutable after startup.

use crate::auth::IdentityResolver;
use filegate_core::Config;
use filegate_db::RecordStore;
use filegate_storage::{ObjectSigner, Storage};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// File registry
    pub files: Arc<dyn RecordStore>,
    /// Presigned URL issuer
    pub signer: Arc<dyn ObjectSigner>,
    /// Direct object operations (delete)
    pub storage: Arc<dyn Storage>,
    /// Bearer token to tenant resolution
    pub identity: Arc<dyn IdentityResolver>,
}
