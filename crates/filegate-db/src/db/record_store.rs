use async_trait::async_trait;
use filegate_core::models::{
    FileDerivative, FileRecord, FileStatus, ProcessingJob, MAX_JOB_TYPE_LEN,
};
use filegate_core::AppError;
use uuid::Uuid;

/// Processing jobs and derivatives owned by a file
#[derive(Debug, Clone, Default)]
pub struct FileRelations {
    pub processing_jobs: Vec<ProcessingJob>,
    pub derivatives: Vec<FileDerivative>,
}

/// Processing job requested alongside an upload confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub job_type: String,
    pub priority: i32,
}

/// Tenant-scoped file registry
///
/// Every lookup takes the caller's `tenant_id` and includes it in the match
/// predicate. A record that exists under another tenant is reported as
/// `NotFound`, exactly like one that does not exist at all.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. `Conflict` if the id or storage key is taken.
    async fn create(&self, record: &FileRecord) -> Result<FileRecord, AppError>;

    /// Set the status of a record in a single conditional update.
    async fn update_status(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        status: FileStatus,
    ) -> Result<FileRecord, AppError>;

    /// Insert a `pending` processing job for a file owned by `tenant_id`.
    async fn create_job(
        &self,
        tenant_id: Uuid,
        file_id: Uuid,
        job_type: &str,
        priority: i32,
    ) -> Result<ProcessingJob, AppError>;

    /// Mark a record `ready` and optionally enqueue one job for it.
    ///
    /// Both writes commit together: if the job is rejected the status is left
    /// untouched. Confirming an already `ready` record succeeds.
    async fn confirm(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        job: Option<NewJob>,
    ) -> Result<(FileRecord, Option<ProcessingJob>), AppError>;

    /// Fetch one record; relations are loaded only when asked for.
    async fn get(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        include_relations: bool,
    ) -> Result<(FileRecord, Option<FileRelations>), AppError>;

    /// One page of records, newest first, plus the total matching the filter.
    async fn list(
        &self,
        tenant_id: Uuid,
        status: Option<FileStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FileRecord>, i64), AppError>;

    /// Delete a record; jobs and derivatives go with it.
    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError>;

    /// Cheap round trip used by the readiness check.
    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn file_not_found() -> AppError {
    AppError::NotFound("File not found".to_string())
}

pub(crate) fn invalid_job_type() -> AppError {
    AppError::InvalidInput(format!(
        "createJob must be between 1 and {} characters",
        MAX_JOB_TYPE_LEN
    ))
}

pub(crate) fn job_type_in_bounds(job_type: &str) -> bool {
    !job_type.is_empty() && job_type.chars().count() <= MAX_JOB_TYPE_LEN
}
