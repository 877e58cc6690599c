//! Upload intent validation.
//!
//! Only the client-declared metadata is checked; the uploaded bytes are never
//! inspected by this service.

use validator::Validate;

use crate::error::AppError;
use crate::models::UploadUrlRequest;

/// An upload request whose declared metadata passed the intent policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadIntent {
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Check an upload request against the content-type allow-list and size cap.
pub fn validate_upload_intent(
    request: &UploadUrlRequest,
    allowed_content_types: &[String],
    max_file_size_bytes: u64,
) -> Result<UploadIntent, AppError> {
    let (filename, content_type, size) = match (
        request.filename.as_deref().map(str::trim),
        request.content_type.as_deref().map(str::trim),
        request.size,
    ) {
        (Some(f), Some(c), Some(s)) if !f.is_empty() && !c.is_empty() => (f, c, s),
        _ => {
            return Err(AppError::InvalidInput(
                "filename, contentType, and size are required".to_string(),
            ))
        }
    };

    request.validate()?;

    let normalized = content_type.to_lowercase();
    if !allowed_content_types.iter().any(|t| *t == normalized) {
        return Err(AppError::InvalidInput(format!(
            "Content type not allowed. Allowed: {}",
            allowed_content_types.join(", ")
        )));
    }

    if size <= 0 {
        return Err(AppError::InvalidInput(
            "File size must be at least 1 byte".to_string(),
        ));
    }

    if size as u64 > max_file_size_bytes {
        return Err(AppError::InvalidInput(format!(
            "File too large. Max: {}MB",
            max_file_size_bytes / 1024 / 1024
        )));
    }

    Ok(UploadIntent {
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        size_bytes: size,
    })
}
