use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use filegate_core::models::{DownloadUrlRequest, DownloadUrlResponse};
use filegate_core::AppError;
use std::sync::Arc;

/// Return a presigned GET URL for a file owned by the caller's tenant
#[utoipa::path(
    post,
    path = "/api/files/download-url",
    tag = "files",
    request_body = DownloadUrlRequest,
    responses(
        (status = 200, description = "Presigned download URL generated", body = DownloadUrlResponse),
        (status = 400, description = "Missing fileId", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        file_id = ?request.file_id,
        operation = "request_download_url"
    )
)]
pub async fn request_download_url(
    tenant_ctx: TenantContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DownloadUrlRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file_id = request
        .file_id
        .ok_or_else(|| AppError::InvalidInput("fileId is required".to_string()))?;

    let (file, _) = state.files.get(file_id, tenant_ctx.tenant_id, false).await?;

    let expires_in = state.config.download_url_expiry();
    let download_url = state.signer.sign_get(&file.storage_key, expires_in).await?;

    tracing::info!(storage_key = %file.storage_key, "Issued presigned download URL");

    Ok(Json(DownloadUrlResponse {
        file_id: file.id,
        filename: file.filename,
        content_type: file.content_type,
        download_url,
        expires_in: expires_in.as_secs(),
    }))
}
