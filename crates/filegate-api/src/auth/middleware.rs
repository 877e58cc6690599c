use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use filegate_core::AppError;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the bearer token into a `TenantContext` before any handler runs.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthenticated(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.trim().is_empty() => token.trim().to_string(),
        Some(_) => {
            return HttpAppError(AppError::Unauthenticated("Invalid token".to_string()))
                .into_response();
        }
        None => {
            return HttpAppError(AppError::Unauthenticated(
                "Invalid authorization header format".to_string(),
            ))
            .into_response();
        }
    };

    match state.identity.resolve(&token).await {
        Ok(tenant_context) => {
            tracing::debug!(
                tenant_id = %tenant_context.tenant_id,
                user_id = %tenant_context.user_id,
                role = %tenant_context.role,
                "Request authenticated"
            );
            request.extensions_mut().insert(tenant_context);
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
