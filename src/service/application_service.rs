// service/application_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{applicationdb::ApplicationExt, db::DBClient, jobdb::JobExt},
    models::{
        applicationmodel::{Application, ApplicationStatus},
        jobmodel::JobStatus,
    },
    service::error::{is_unique_violation, ServiceError},
};

/// Owns the application lifecycle and keeps the owning job's cached
/// application counter consistent with the true set of application rows.
#[derive(Debug, Clone)]
pub struct ApplicationService {
    db_client: Arc<DBClient>,
}

impl ApplicationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Apply to a job. Guard order: missing job, then non-open job, then
    /// duplicate application. Creation and the counter increment run as one
    /// store transaction; a concurrent duplicate loses the race on the
    /// unique (job, worker) index and surfaces as DuplicateApplication.
    pub async fn apply(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
        cover_message: Option<String>,
    ) -> Result<Application, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.status != JobStatus::Open {
            return Err(ServiceError::JobNotOpen(job_id));
        }

        let existing = self
            .db_client
            .get_application_by_job_and_worker(job_id, worker_id)
            .await?;

        if existing.is_some() {
            return Err(ServiceError::DuplicateApplication);
        }

        let application = self
            .db_client
            .create_application(job_id, worker_id, cover_message)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ServiceError::DuplicateApplication
                } else {
                    ServiceError::Database(e)
                }
            })?;

        Ok(application)
    }

    /// Employer accepts or rejects a pending application, optionally with a
    /// response message. Only the employer owning the job may respond, and
    /// only while the application is still pending.
    pub async fn respond(
        &self,
        application_id: Uuid,
        employer_id: Uuid,
        status: ApplicationStatus,
        message: Option<String>,
    ) -> Result<Application, ServiceError> {
        if !matches!(
            status,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected
        ) {
            return Err(ServiceError::Validation(
                "Response status must be accepted or rejected".to_string(),
            ));
        }

        let application = self
            .db_client
            .get_application(application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        let job = self
            .db_client
            .get_job_by_id(application.job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(application.job_id))?;

        if job.employer_id != employer_id {
            return Err(ServiceError::Forbidden(employer_id, application_id));
        }

        if !application.status.can_transition_to(status) {
            return Err(ServiceError::InvalidTransition(
                application_id,
                application.status,
                status,
            ));
        }

        let updated = self
            .db_client
            .set_employer_response(application_id, status, message)
            .await?;

        Ok(updated)
    }

    /// Worker withdraws a pending application. The row is kept, so the
    /// unique (job, worker) slot stays burned and the job counter is
    /// unchanged.
    pub async fn withdraw(
        &self,
        application_id: Uuid,
        worker_id: Uuid,
    ) -> Result<Application, ServiceError> {
        let application = self
            .db_client
            .get_application(application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        if application.worker_id != worker_id {
            return Err(ServiceError::Forbidden(worker_id, application_id));
        }

        if !application
            .status
            .can_transition_to(ApplicationStatus::Withdrawn)
        {
            return Err(ServiceError::InvalidTransition(
                application_id,
                application.status,
                ApplicationStatus::Withdrawn,
            ));
        }

        let updated = self
            .db_client
            .update_application_status(application_id, ApplicationStatus::Withdrawn)
            .await?;

        Ok(updated)
    }

    /// Worker deletes an application outright. Removal and the counter
    /// decrement run as one transaction, symmetric with apply.
    pub async fn remove(
        &self,
        application_id: Uuid,
        worker_id: Uuid,
    ) -> Result<(), ServiceError> {
        let application = self
            .db_client
            .get_application(application_id)
            .await?
            .ok_or(ServiceError::ApplicationNotFound(application_id))?;

        if application.worker_id != worker_id {
            return Err(ServiceError::Forbidden(worker_id, application_id));
        }

        self.db_client
            .delete_application(application_id)
            .await
            .map_err(|e| match e {
                // Lost a race with another delete of the same row.
                sqlx::Error::RowNotFound => ServiceError::ApplicationNotFound(application_id),
                other => ServiceError::Database(other),
            })?;

        Ok(())
    }

    /// Listing for the employer owning the job.
    pub async fn applications_for_job(
        &self,
        job_id: Uuid,
        employer_id: Uuid,
    ) -> Result<Vec<Application>, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        if job.employer_id != employer_id {
            return Err(ServiceError::Forbidden(employer_id, job_id));
        }

        let applications = self.db_client.get_applications_for_job(job_id).await?;
        Ok(applications)
    }

    pub async fn applications_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<Application>, ServiceError> {
        let applications = self.db_client.get_applications_for_worker(worker_id).await?;
        Ok(applications)
    }
}
