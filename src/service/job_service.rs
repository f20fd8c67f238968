// service/job_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        jobdb::{CategoryCount, CategoryStat, JobExt, JobFilter, JobTotals, TypeCount},
    },
    dtos::jobdtos::CreateJobDto,
    models::jobmodel::{Job, JobStatus, JobSummary},
    service::{error::ServiceError, notification_service::NotificationService},
};

const SIMILAR_JOBS_LIMIT: i64 = 3;
const FEATURED_JOBS_LIMIT: i64 = 10;
const TOP_CATEGORIES_LIMIT: i64 = 5;

#[derive(Debug)]
pub struct JobStats {
    pub totals: JobTotals,
    pub by_type: Vec<TypeCount>,
    pub top_categories: Vec<CategoryCount>,
}

/// Owns the job lifecycle: creation, the view-counting read, discovery
/// listings and the aggregate endpoints.
#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn create_job(
        &self,
        employer_id: Uuid,
        data: CreateJobDto,
    ) -> Result<Job, ServiceError> {
        let salary_amount = BigDecimal::try_from(data.salary.amount)
            .map_err(|_| ServiceError::Validation("Invalid salary amount".to_string()))?;

        let job = self
            .db_client
            .create_job(
                employer_id,
                data.title,
                data.description,
                data.job_type,
                data.category,
                data.skills.unwrap_or_default(),
                data.county,
                data.sub_county,
                data.ward,
                data.exact_location,
                salary_amount,
                data.salary.period,
                data.salary.negotiable,
                data.urgent.unwrap_or(false),
            )
            .await?;

        self.notification_service.notify_new_job(&job);

        Ok(job)
    }

    /// Fetch a job for display. This read is deliberately NOT idempotent:
    /// every call increments the job's view counter by one and persists the
    /// increment (the popularity signal has no separate analytics pipeline).
    /// The increment is a store-side atomic update, so N concurrent calls
    /// count exactly N views. Also returns up to 3 open jobs from the same
    /// category as a summary projection.
    pub async fn get_job(&self, job_id: Uuid) -> Result<(Job, Vec<JobSummary>), ServiceError> {
        let job = self
            .db_client
            .increment_job_views(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let similar_jobs = self
            .db_client
            .get_similar_jobs(job_id, job.category, SIMILAR_JOBS_LIMIT)
            .await?;

        Ok((job, similar_jobs))
    }

    pub async fn list_jobs(
        &self,
        filter: &JobFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, ServiceError> {
        let jobs = self.db_client.get_jobs(filter, limit, offset).await?;
        Ok(jobs)
    }

    pub async fn featured_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        let jobs = self.db_client.get_featured_jobs(FEATURED_JOBS_LIMIT).await?;
        Ok(jobs)
    }

    /// Per-category count and average salary over open jobs, count
    /// descending. Closed/filled/cancelled jobs never contribute.
    pub async fn categories(&self) -> Result<Vec<CategoryStat>, ServiceError> {
        let stats = self.db_client.get_category_stats().await?;
        Ok(stats)
    }

    pub async fn stats(&self) -> Result<JobStats, ServiceError> {
        let totals = self.db_client.get_job_totals().await?;
        let by_type = self.db_client.get_jobs_by_type_counts().await?;
        let top_categories = self
            .db_client
            .get_top_categories(TOP_CATEGORIES_LIMIT)
            .await?;

        Ok(JobStats {
            totals,
            by_type,
            top_categories,
        })
    }

    /// Employer-driven status change. Any status is settable by the owning
    /// employer; there is no job-side transition table.
    pub async fn update_status(
        &self,
        job_id: Uuid,
        employer_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.employer_id != employer_id {
            return Err(ServiceError::Forbidden(employer_id, job_id));
        }

        let updated = self.db_client.update_job_status(job_id, status).await?;
        Ok(updated)
    }

    /// Platform-side promotion: flag a job as featured, optionally until a
    /// given expiry. Independent of urgency.
    pub async fn set_featured(
        &self,
        job_id: Uuid,
        featured: bool,
        promoted_until: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let updated = self
            .db_client
            .set_job_featured(job.id, featured, promoted_until)
            .await?;
        Ok(updated)
    }
}
