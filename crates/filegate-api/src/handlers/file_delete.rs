use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use filegate_core::models::DeleteFileResponse;
use std::sync::Arc;
use uuid::Uuid;

/// Delete a file's object and its registry record
///
/// The object delete is attempted once; a storage failure is logged and the
/// record is removed anyway.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = DeleteFileResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        file_id = %id,
        operation = "delete_file"
    )
)]
pub async fn delete_file(
    tenant_ctx: TenantContext,
    ValidatedPath(id): ValidatedPath<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (file, _) = state.files.get(id, tenant_ctx.tenant_id, false).await?;

    if let Err(e) = state.storage.delete(&file.storage_key).await {
        tracing::warn!(
            error = %e,
            storage_key = %file.storage_key,
            backend = state.storage.backend_name(),
            "Object delete failed, removing record anyway"
        );
    }

    state.files.delete(id, tenant_ctx.tenant_id).await?;

    tracing::info!(storage_key = %file.storage_key, "File deleted");

    Ok(Json(DeleteFileResponse {
        success: true,
        deleted_id: id,
    }))
}
