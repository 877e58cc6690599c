//! Service and repository wiring

use crate::auth::GoTrueIdentityResolver;
use crate::state::AppState;
use anyhow::{Context, Result};
use filegate_core::Config;
use filegate_db::{FileRepository, TenantMemberRepository};
use filegate_storage::{ObjectSigner, Storage};
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    signer: Arc<dyn ObjectSigner>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let files = Arc::new(FileRepository::new(pool.clone()));
    let members = TenantMemberRepository::new(pool);
    let identity = GoTrueIdentityResolver::new(config, members)
        .context("Failed to build identity client")?;

    tracing::info!("Services initialized");

    Ok(Arc::new(AppState {
        config: config.clone(),
        files,
        signer,
        storage,
        identity: Arc::new(identity),
    }))
}
