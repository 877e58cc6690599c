use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use filegate_core::models::{FileListQuery, FileListResponse, DEFAULT_LIST_LIMIT};
use filegate_core::AppError;
use std::sync::Arc;

/// List the caller's files, newest first
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(FileListQuery),
    responses(
        (status = 200, description = "Page of files", body = FileListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, query),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        operation = "list_files"
    )
)]
pub async fn list_files(
    tenant_ctx: TenantContext,
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<FileListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0);
    if limit < 0 || offset < 0 {
        return Err(AppError::InvalidInput(
            "limit and offset must not be negative".to_string(),
        )
        .into());
    }

    let (files, total) = state
        .files
        .list(tenant_ctx.tenant_id, query.status, limit, offset)
        .await?;

    tracing::debug!(returned = files.len(), total, "Listed files");

    Ok(Json(FileListResponse { files, total }))
}
