use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath};
use crate::state::AppState;
use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use filegate_core::models::{ConfirmUploadRequest, FileRecord};
use filegate_core::AppError;
use filegate_db::NewJob;
use std::sync::Arc;
use uuid::Uuid;

/// The body is optional: an empty body confirms without creating a job.
fn parse_confirm_body(body: &[u8]) -> Result<ConfirmUploadRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ConfirmUploadRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))
}

/// Mark an upload as complete, optionally queueing a processing job
///
/// Confirming an already `ready` file succeeds and leaves it `ready`.
#[utoipa::path(
    post,
    path = "/api/files/{id}/confirm",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body(content = ConfirmUploadRequest, description = "Optional job to create"),
    responses(
        (status = 200, description = "File confirmed", body = FileRecord),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        file_id = %id,
        operation = "confirm_upload"
    )
)]
pub async fn confirm_upload(
    tenant_ctx: TenantContext,
    ValidatedPath(id): ValidatedPath<Uuid>,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = parse_confirm_body(&body)?;

    let job = request
        .create_job
        .as_deref()
        .map(str::trim)
        .filter(|job_type| !job_type.is_empty())
        .map(|job_type| NewJob {
            job_type: job_type.to_string(),
            priority: request.priority.unwrap_or(0),
        });

    // Status and job commit together or not at all
    let (record, job) = state.files.confirm(id, tenant_ctx.tenant_id, job).await?;

    if let Some(job) = job {
        tracing::info!(job_id = %job.id, job_type = %job.job_type, "Processing job created");
    }

    tracing::info!("Upload confirmed");

    Ok(Json(record))
}
