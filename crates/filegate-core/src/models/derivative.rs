use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Artifact produced by external processing of a file (read-only here)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileDerivative {
    pub id: Uuid,
    pub file_id: Uuid,
    pub derivative_type: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: Option<i64>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
