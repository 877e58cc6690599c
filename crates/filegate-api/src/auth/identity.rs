//! Identity resolution against the hosted auth provider.

use super::models::TenantContext;
use async_trait::async_trait;
use filegate_core::{AppError, Config};
use filegate_db::TenantMemberRepository;
use serde::Deserialize;
use uuid::Uuid;

/// Resolves a bearer token to the caller's tenant context.
///
/// Fails with `Unauthenticated` when the token is rejected and `Forbidden`
/// when the user belongs to no tenant.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<TenantContext, AppError>;
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
}

/// Verifies sessions with a GoTrue-compatible `/auth/v1/user` endpoint and pins
/// the user to their first tenant membership.
pub struct GoTrueIdentityResolver {
    client: reqwest::Client,
    user_url: String,
    service_key: String,
    members: TenantMemberRepository,
}

impl GoTrueIdentityResolver {
    pub fn new(config: &Config, members: TenantMemberRepository) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.identity_timeout())
            .build()?;

        Ok(Self {
            client,
            user_url: format!("{}/auth/v1/user", config.identity_url().trim_end_matches('/')),
            service_key: config.identity_service_key().to_string(),
            members,
        })
    }

    async fn verify_session(&self, token: &str) -> Result<Uuid, AppError> {
        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Internal("Identity provider timed out".to_string())
                } else {
                    AppError::Internal(format!("Identity provider unreachable: {}", e))
                }
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Identity provider rejected token");
            return Err(AppError::Unauthenticated("Invalid token".to_string()));
        }

        let user: GoTrueUser = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Malformed identity response: {}", e)))?;

        Ok(user.id)
    }
}

#[async_trait]
impl IdentityResolver for GoTrueIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<TenantContext, AppError> {
        let user_id = self.verify_session(token).await?;

        let membership = self
            .members
            .first_membership(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("User has no tenant access".to_string()))?;

        Ok(TenantContext {
            tenant_id: membership.tenant_id,
            user_id,
            role: membership.role,
        })
    }
}
