use chrono::{DateTime, Utc};
use filegate_core::models::TenantMembership;
use filegate_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for tenant membership lookups
#[derive(Clone)]
pub struct TenantMemberRepository {
    pool: PgPool,
}

impl TenantMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The user's oldest membership, if any.
    ///
    /// A user belonging to several tenants is pinned to this one for the request.
    #[tracing::instrument(skip(self))]
    pub async fn first_membership(
        &self,
        user_id: Uuid,
    ) -> Result<Option<TenantMembership>, AppError> {
        let row: Option<(Uuid, Uuid, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT user_id, tenant_id, role, created_at
            FROM tenant_members
            WHERE user_id = $1
            ORDER BY created_at ASC, tenant_id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(user_id, tenant_id, role, created_at)| {
            Ok(TenantMembership {
                user_id,
                tenant_id,
                role: role.parse().map_err(AppError::from)?,
                created_at,
            })
        })
        .transpose()
    }
}
