//! In-memory `RecordStore` for tests.
//!
//! Mirrors the PostgreSQL repository semantics: tenant-scoped predicates,
//! newest-first ordering with an id tie-break, and cascading deletes.

use async_trait::async_trait;
use chrono::Utc;
use filegate_core::models::{FileDerivative, FileRecord, FileStatus, ProcessingJob};
use filegate_core::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::record_store::{
    file_not_found, invalid_job_type, job_type_in_bounds, FileRelations, NewJob, RecordStore,
};

#[derive(Default)]
struct Tables {
    files: HashMap<Uuid, FileRecord>,
    jobs: Vec<ProcessingJob>,
    derivatives: Vec<FileDerivative>,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a derivative, as an external worker would.
    pub async fn insert_derivative(&self, derivative: FileDerivative) {
        self.tables.write().await.derivatives.push(derivative);
    }

    /// All jobs for a file regardless of tenant.
    pub async fn jobs_for(&self, file_id: Uuid) -> Vec<ProcessingJob> {
        self.tables
            .read()
            .await
            .jobs
            .iter()
            .filter(|j| j.file_id == file_id)
            .cloned()
            .collect()
    }

    pub async fn file_count(&self) -> usize {
        self.tables.read().await.files.len()
    }
}

fn owned<'a>(tables: &'a Tables, id: Uuid, tenant_id: Uuid) -> Option<&'a FileRecord> {
    tables.files.get(&id).filter(|f| f.tenant_id == tenant_id)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, record: &FileRecord) -> Result<FileRecord, AppError> {
        let mut tables = self.tables.write().await;
        let key_taken = tables
            .files
            .values()
            .any(|f| f.storage_key == record.storage_key);
        if tables.files.contains_key(&record.id) || key_taken {
            return Err(AppError::Conflict(format!(
                "File record {} already exists",
                record.id
            )));
        }
        tables.files.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn update_status(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        status: FileStatus,
    ) -> Result<FileRecord, AppError> {
        let mut tables = self.tables.write().await;
        let file = tables
            .files
            .get_mut(&id)
            .filter(|f| f.tenant_id == tenant_id)
            .ok_or_else(file_not_found)?;
        file.status = status;
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn create_job(
        &self,
        tenant_id: Uuid,
        file_id: Uuid,
        job_type: &str,
        priority: i32,
    ) -> Result<ProcessingJob, AppError> {
        if !job_type_in_bounds(job_type) {
            return Err(invalid_job_type());
        }
        let mut tables = self.tables.write().await;
        owned(&tables, file_id, tenant_id).ok_or_else(file_not_found)?;
        let job = ProcessingJob::new_pending(file_id, job_type.to_string(), priority);
        tables.jobs.push(job.clone());
        Ok(job)
    }

    async fn confirm(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        job: Option<NewJob>,
    ) -> Result<(FileRecord, Option<ProcessingJob>), AppError> {
        let mut tables = self.tables.write().await;
        owned(&tables, id, tenant_id).ok_or_else(file_not_found)?;

        // Validate everything before the first write
        let job = match job {
            Some(job) if !job_type_in_bounds(&job.job_type) => return Err(invalid_job_type()),
            Some(job) => Some(ProcessingJob::new_pending(id, job.job_type, job.priority)),
            None => None,
        };

        let file = tables.files.get_mut(&id).ok_or_else(file_not_found)?;
        file.status = FileStatus::Ready;
        file.updated_at = Utc::now();
        let file = file.clone();

        if let Some(job) = &job {
            tables.jobs.push(job.clone());
        }

        Ok((file, job))
    }

    async fn get(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        include_relations: bool,
    ) -> Result<(FileRecord, Option<FileRelations>), AppError> {
        let tables = self.tables.read().await;
        let file = owned(&tables, id, tenant_id)
            .cloned()
            .ok_or_else(file_not_found)?;

        let relations = include_relations.then(|| {
            let mut processing_jobs: Vec<ProcessingJob> = tables
                .jobs
                .iter()
                .filter(|j| j.file_id == id)
                .cloned()
                .collect();
            processing_jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            FileRelations {
                processing_jobs,
                derivatives: tables
                    .derivatives
                    .iter()
                    .filter(|d| d.file_id == id)
                    .cloned()
                    .collect(),
            }
        });

        Ok((file, relations))
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        status: Option<FileStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FileRecord>, i64), AppError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&FileRecord> = tables
            .files
            .values()
            .filter(|f| f.tenant_id == tenant_id)
            .filter(|f| status.map_or(true, |s| f.status == s))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        owned(&tables, id, tenant_id).ok_or_else(file_not_found)?;
        tables.files.remove(&id);
        tables.jobs.retain(|j| j.file_id != id);
        tables.derivatives.retain(|d| d.file_id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
