// db/applicationdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::applicationmodel::{Application, ApplicationStatus};

#[async_trait]
pub trait ApplicationExt {
    /// Inserts the application and bumps the owning job's cached counter in
    /// a single transaction, so the derived counter can never drift from the
    /// row set through this path. A unique violation on (job_id, worker_id)
    /// rolls the whole unit back.
    async fn create_application(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
        cover_message: Option<String>,
    ) -> Result<Application, sqlx::Error>;

    async fn get_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error>;

    async fn get_application_by_job_and_worker(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error>;

    async fn get_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<Application>, sqlx::Error>;

    async fn get_applications_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<Application>, sqlx::Error>;

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, sqlx::Error>;

    async fn set_employer_response(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        message: Option<String>,
    ) -> Result<Application, sqlx::Error>;

    /// Deletes the row and decrements the job counter symmetrically, in one
    /// transaction.
    async fn delete_application(&self, application_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ApplicationExt for DBClient {
    async fn create_application(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
        cover_message: Option<String>,
    ) -> Result<Application, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (job_id, worker_id, cover_message)
            VALUES ($1, $2, $3)
            RETURNING
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(worker_id)
        .bind(cover_message)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE jobs
            SET applications_count = applications_count + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(application)
    }

    async fn get_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_application_by_job_and_worker(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            FROM applications
            WHERE job_id = $1 AND worker_id = $2
            "#,
        )
        .bind(job_id)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            FROM applications
            WHERE job_id = $1
            ORDER BY applied_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_applications_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            FROM applications
            WHERE worker_id = $1
            ORDER BY applied_at DESC
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            "#,
        )
        .bind(application_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_employer_response(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        message: Option<String>,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $2,
                response_message = $3,
                responded_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, job_id, worker_id, status, cover_message, applied_at,
                response_message, responded_at,
                created_at, updated_at
            "#,
        )
        .bind(application_id)
        .bind(status)
        .bind(message)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_application(&self, application_id: Uuid) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let job_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            DELETE FROM applications
            WHERE id = $1
            RETURNING job_id
            "#,
        )
        .bind(application_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE jobs
            SET applications_count = GREATEST(applications_count - 1, 0),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
