use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filegate_core::models::{FileDerivative, FileRecord, FileStatus, JobStatus, ProcessingJob};
use filegate_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::record_store::{
    file_not_found, invalid_job_type, job_type_in_bounds, FileRelations, NewJob, RecordStore,
};

const FILE_COLUMNS: &str = "id, tenant_id, filename, content_type, size_bytes, storage_key, \
     visibility, status, uploaded_by, created_at, updated_at";

const JOB_COLUMNS: &str = "id, file_id, job_type, status, priority, worker_id, result_data, \
     error_message, created_at, completed_at";

/// PostgreSQL-backed file registry
#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_relations(&self, file_id: Uuid) -> Result<FileRelations, AppError> {
        let job_rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM processing_jobs WHERE file_id = $1 ORDER BY created_at DESC",
            JOB_COLUMNS
        ))
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;

        let derivatives = sqlx::query_as::<_, DerivativeRow>(
            r#"
            SELECT id, file_id, derivative_type, storage_key, content_type,
                   size_bytes, metadata, created_at
            FROM file_derivatives
            WHERE file_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;

        let processing_jobs = job_rows
            .into_iter()
            .map(ProcessingJob::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileRelations {
            processing_jobs,
            derivatives: derivatives.into_iter().map(FileDerivative::from).collect(),
        })
    }
}

#[async_trait]
impl RecordStore for FileRepository {
    #[tracing::instrument(skip(self, record), fields(file_id = %record.id, tenant_id = %record.tenant_id))]
    async fn create(&self, record: &FileRecord) -> Result<FileRecord, AppError> {
        // Use dynamic SQLx queries to avoid requiring DATABASE_URL/sqlx prepare
        let result = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            INSERT INTO files (
                id, tenant_id, filename, content_type, size_bytes, storage_key,
                visibility, status, uploaded_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(record.id)
        .bind(record.tenant_id)
        .bind(&record.filename)
        .bind(&record.content_type)
        .bind(record.size_bytes)
        .bind(&record.storage_key)
        .bind(record.visibility.to_string())
        .bind(record.status.to_string())
        .bind(record.uploaded_by)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => FileRecord::try_from(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "File record {} already exists",
                    record.id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        status: FileStatus,
    ) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            UPDATE files
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(tenant_id)
        .bind(status.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(file_not_found)?;

        FileRecord::try_from(row)
    }

    #[tracing::instrument(skip(self))]
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

        // Ownership check and insert in one statement
        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO processing_jobs (id, file_id, job_type, status, priority)
            SELECT $1, f.id, $3, $4, $5
            FROM files f
            WHERE f.id = $2 AND f.tenant_id = $6
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(file_id)
        .bind(job_type)
        .bind(JobStatus::Pending.to_string())
        .bind(priority)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(file_not_found)?;

        ProcessingJob::try_from(row)
    }

    #[tracing::instrument(skip(self))]
    async fn confirm(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        job: Option<NewJob>,
    ) -> Result<(FileRecord, Option<ProcessingJob>), AppError> {
        // Dropping the transaction on an early return rolls the update back
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            UPDATE files
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(tenant_id)
        .bind(FileStatus::Ready.to_string())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(file_not_found)?;
        let file = FileRecord::try_from(row)?;

        let job = match job {
            Some(job) => {
                if !job_type_in_bounds(&job.job_type) {
                    return Err(invalid_job_type());
                }
                let result = sqlx::query_as::<_, JobRow>(&format!(
                    r#"
                    INSERT INTO processing_jobs (id, file_id, job_type, status, priority)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING {}
                    "#,
                    JOB_COLUMNS
                ))
                .bind(Uuid::new_v4())
                .bind(file.id)
                .bind(&job.job_type)
                .bind(JobStatus::Pending.to_string())
                .bind(job.priority)
                .fetch_one(&mut *tx)
                .await;

                match result {
                    Ok(row) => Some(ProcessingJob::try_from(row)?),
                    Err(sqlx::Error::Database(db_err)) if db_err.is_check_violation() => {
                        return Err(invalid_job_type());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => None,
        };

        tx.commit().await?;

        Ok((file, job))
    }

    #[tracing::instrument(skip(self))]
    async fn get(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        include_relations: bool,
    ) -> Result<(FileRecord, Option<FileRelations>), AppError> {
        let row = sqlx::query_as::<_, FileRow>(&format!(
            "SELECT {} FROM files WHERE id = $1 AND tenant_id = $2",
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(file_not_found)?;

        let file = FileRecord::try_from(row)?;
        let relations = if include_relations {
            Some(self.load_relations(file.id).await?)
        } else {
            None
        };

        Ok((file, relations))
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        tenant_id: Uuid,
        status: Option<FileStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<FileRecord>, i64), AppError> {
        let status = status.map(|s| s.to_string());

        let rows = sqlx::query_as::<_, FileRow>(&format!(
            r#"
            SELECT {}
            FROM files
            WHERE tenant_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
            FILE_COLUMNS
        ))
        .bind(tenant_id)
        .bind(status.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM files
            WHERE tenant_id = $1 AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(status.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let files = rows
            .into_iter()
            .map(FileRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((files, total))
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(file_not_found());
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Raw `files` row; enum columns are stored as text
#[derive(Debug)]
struct FileRow {
    id: Uuid,
    tenant_id: Uuid,
    filename: String,
    content_type: String,
    size_bytes: i64,
    storage_key: String,
    visibility: String,
    status: String,
    uploaded_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for FileRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(FileRow {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            filename: row.try_get("filename")?,
            content_type: row.try_get("content_type")?,
            size_bytes: row.try_get("size_bytes")?,
            storage_key: row.try_get("storage_key")?,
            visibility: row.try_get("visibility")?,
            status: row.try_get("status")?,
            uploaded_by: row.try_get("uploaded_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<FileRow> for FileRecord {
    type Error = AppError;

    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        Ok(FileRecord {
            id: row.id,
            tenant_id: row.tenant_id,
            filename: row.filename,
            content_type: row.content_type,
            size_bytes: row.size_bytes,
            storage_key: row.storage_key,
            visibility: row.visibility.parse().map_err(AppError::from)?,
            status: row.status.parse().map_err(AppError::from)?,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug)]
struct JobRow {
    id: Uuid,
    file_id: Uuid,
    job_type: String,
    status: String,
    priority: i32,
    worker_id: Option<String>,
    result_data: Option<serde_json::Value>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for JobRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(JobRow {
            id: row.try_get("id")?,
            file_id: row.try_get("file_id")?,
            job_type: row.try_get("job_type")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            worker_id: row.try_get("worker_id")?,
            result_data: row.try_get("result_data")?,
            error_message: row.try_get("error_message")?,
            created_at: row.try_get("created_at")?,
            completed_at: row.try_get("completed_at")?,
        })
    }
}

impl TryFrom<JobRow> for ProcessingJob {
    type Error = AppError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(ProcessingJob {
            id: row.id,
            file_id: row.file_id,
            job_type: row.job_type,
            status: row.status.parse().map_err(AppError::from)?,
            priority: row.priority,
            worker_id: row.worker_id,
            result_data: row.result_data,
            error_message: row.error_message,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DerivativeRow {
    id: Uuid,
    file_id: Uuid,
    derivative_type: String,
    storage_key: String,
    content_type: String,
    size_bytes: Option<i64>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<DerivativeRow> for FileDerivative {
    fn from(row: DerivativeRow) -> Self {
        FileDerivative {
            id: row.id,
            file_id: row.file_id,
            derivative_type: row.derivative_type,
            storage_key: row.storage_key,
            content_type: row.content_type,
            size_bytes: row.size_bytes,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}
