use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{FileDerivative, ProcessingJob};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Ready,
}

impl Display for FileStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileStatus::Pending => write!(f, "pending"),
            FileStatus::Ready => write!(f, "ready"),
        }
    }
}

impl FromStr for FileStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FileStatus::Pending),
            "ready" => Ok(FileStatus::Ready),
            _ => Err(anyhow::anyhow!("Invalid file status: {}", s)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Visibility::Private => write!(f, "private"),
        }
    }
}

impl FromStr for Visibility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            _ => Err(anyhow::anyhow!("Invalid visibility: {}", s)),
        }
    }
}

/// One uploaded (or still pending) object owned by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub filename: String,
    pub content_type: String,
    /// Size declared by the client at upload intent time
    pub size_bytes: i64,
    pub storage_key: String,
    pub visibility: Visibility,
    pub status: FileStatus,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Build a fresh `pending` record for an upload intent.
    pub fn new_pending(
        id: Uuid,
        tenant_id: Uuid,
        uploaded_by: Uuid,
        filename: String,
        content_type: String,
        size_bytes: i64,
        storage_key: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            tenant_id,
            filename,
            content_type,
            size_bytes,
            storage_key,
            visibility: Visibility::Private,
            status: FileStatus::Pending,
            uploaded_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A file record together with its processing jobs and derivatives
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    #[serde(flatten)]
    pub file: FileRecord,
    pub processing_jobs: Vec<ProcessingJob>,
    pub derivatives: Vec<FileDerivative>,
}

/// Request for a presigned upload URL
///
/// Fields are optional at the wire level so a missing field is reported as
/// `400 INVALID_INPUT` rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Original filename
    #[serde(default)]
    #[validate(length(max = 255, message = "Filename must be at most 255 characters"))]
    pub filename: Option<String>,
    /// Content type (MIME type)
    #[serde(default)]
    #[validate(length(max = 255, message = "Content type must be at most 255 characters"))]
    pub content_type: Option<String>,
    /// Declared file size in bytes; whole-valued floats such as `1000.0` are accepted
    #[serde(default, deserialize_with = "whole_number")]
    pub size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub file_id: Uuid,
    /// Presigned PUT URL
    pub upload_url: String,
    pub storage_key: String,
    /// URL lifetime in seconds
    pub expires_in: u64,
}

/// Optional body for confirming an upload
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadRequest {
    /// Job type to enqueue once the upload is confirmed
    #[serde(default)]
    pub create_job: Option<String>,
    /// Job priority, defaults to 0
    #[serde(default)]
    pub priority: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlRequest {
    #[serde(default)]
    pub file_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlResponse {
    pub file_id: Uuid,
    pub filename: String,
    pub content_type: String,
    /// Presigned GET URL
    pub download_url: String,
    /// URL lifetime in seconds
    pub expires_in: u64,
}

pub const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileListQuery {
    /// Filter by status; empty means no filter
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<FileStatus>,
    /// Page size, defaults to 50
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    /// Number of records to skip, defaults to 0
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub offset: Option<i64>,
}

/// Query values arrive as text; `?limit=` is the same as leaving `limit` out.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

// Beyond 2^53 an f64 no longer represents every integer.
const MAX_EXACT_F64_INTEGER: f64 = 9_007_199_254_740_992.0;

fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Number::Int(n)) => Ok(Some(n)),
        Some(Number::Float(f)) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64_INTEGER => {
            Ok(Some(f as i64))
        }
        Some(Number::Float(f)) => Err(de::Error::custom(format!(
            "size must be a whole number of bytes, got {}",
            f
        ))),
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileListResponse {
    pub files: Vec<FileRecord>,
    /// Total number of records matching the filter
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileResponse {
    pub success: bool,
    pub deleted_id: Uuid,
}
