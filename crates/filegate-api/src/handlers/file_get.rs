use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use filegate_core::models::FileDetails;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File with processing jobs and derivatives", body = FileDetails),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        file_id = %id,
        operation = "get_file"
    )
)]
pub async fn get_file(
    tenant_ctx: TenantContext,
    ValidatedPath(id): ValidatedPath<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (file, relations) = state.files.get(id, tenant_ctx.tenant_id, true).await?;
    let relations = relations.unwrap_or_default();

    Ok(Json(FileDetails {
        file,
        processing_jobs: relations.processing_jobs,
        derivatives: relations.derivatives,
    }))
}
