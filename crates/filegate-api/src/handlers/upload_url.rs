use crate::auth::models::TenantContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use filegate_core::models::{FileRecord, UploadUrlRequest, UploadUrlResponse};
use filegate_core::validation::validate_upload_intent;
use filegate_storage::generate_storage_key;
use std::sync::Arc;
use uuid::Uuid;

/// Register a pending file and return a presigned PUT URL for it
#[utoipa::path(
    post,
    path = "/api/files/upload-url",
    tag = "files",
    request_body = UploadUrlRequest,
    responses(
        (status = 200, description = "Presigned upload URL generated", body = UploadUrlResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        tenant_id = %tenant_ctx.tenant_id,
        user_id = %tenant_ctx.user_id,
        file_id = tracing::field::Empty,
        operation = "request_upload_url"
    )
)]
pub async fn request_upload_url(
    tenant_ctx: TenantContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadUrlRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let intent = validate_upload_intent(
        &request,
        state.config.allowed_content_types(),
        state.config.max_file_size_bytes(),
    )?;

    let file_id = Uuid::new_v4();
    tracing::Span::current().record("file_id", tracing::field::display(file_id));
    let storage_key = generate_storage_key(tenant_ctx.tenant_id, file_id, &intent.filename);

    let record = FileRecord::new_pending(
        file_id,
        tenant_ctx.tenant_id,
        tenant_ctx.user_id,
        intent.filename,
        intent.content_type,
        intent.size_bytes,
        storage_key,
    );
    let record = state.files.create(&record).await?;

    // The pending record stays behind if signing fails
    let expires_in = state.config.upload_url_expiry();
    let upload_url = state
        .signer
        .sign_put(
            &record.storage_key,
            &record.content_type,
            record.size_bytes as u64,
            expires_in,
        )
        .await?;

    tracing::info!(
        storage_key = %record.storage_key,
        content_type = %record.content_type,
        size_bytes = record.size_bytes,
        "Issued presigned upload URL"
    );

    Ok(Json(UploadUrlResponse {
        file_id: record.id,
        upload_url,
        storage_key: record.storage_key,
        expires_in: expires_in.as_secs(),
    }))
}
