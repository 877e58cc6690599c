//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use filegate_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filegate API",
        version = "0.1.0",
        description = "Multi-tenant file service. Clients upload and download object bytes directly against object storage through short-lived presigned URLs; this API tracks file metadata and processing jobs per tenant."
    ),
    paths(
        handlers::upload_url::request_upload_url,
        handlers::confirm::confirm_upload,
        handlers::download_url::request_download_url,
        handlers::file_list::list_files,
        handlers::file_get::get_file,
        handlers::file_delete::delete_file,
    ),
    components(
        schemas(
            models::FileRecord,
            models::FileStatus,
            models::Visibility,
            models::FileDetails,
            models::ProcessingJob,
            models::JobStatus,
            models::FileDerivative,
            models::UploadUrlRequest,
            models::UploadUrlResponse,
            models::ConfirmUploadRequest,
            models::DownloadUrlRequest,
            models::DownloadUrlResponse,
            models::FileListResponse,
            models::DeleteFileResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "files", description = "Presigned transfers and the file registry")
    )
)]
pub struct ApiDoc;
