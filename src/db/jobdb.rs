// db/jobdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::jobmodel::{Job, JobCategory, JobStatus, JobSummary, JobType, SalaryPeriod};

/// Filter over job listings. Unset fields do not constrain the result set.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub county: Option<String>,
    pub category: Option<JobCategory>,
    pub job_type: Option<JobType>,
    /// Any overlap with the job's skill set matches.
    pub skills: Option<Vec<String>>,
    pub min_salary: Option<BigDecimal>,
    pub max_salary: Option<BigDecimal>,
    pub urgent: Option<bool>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CategoryStat {
    pub category: JobCategory,
    pub count: i64,
    pub avg_salary: Option<BigDecimal>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct TypeCount {
    pub job_type: JobType,
    pub count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: JobCategory,
    pub count: i64,
}

/// Aggregates over open jobs for the public stats endpoint.
#[derive(Debug, sqlx::FromRow)]
pub struct JobTotals {
    pub total_jobs: i64,
    pub total_views: i64,
    pub avg_salary: Option<BigDecimal>,
    pub urgent_jobs: i64,
}

#[async_trait]
pub trait JobExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_job(
        &self,
        employer_id: Uuid,
        title: String,
        description: String,
        job_type: JobType,
        category: JobCategory,
        skills: Vec<String>,
        county: String,
        sub_county: Option<String>,
        ward: Option<String>,
        exact_location: Option<String>,
        salary_amount: BigDecimal,
        salary_period: SalaryPeriod,
        salary_negotiable: bool,
        urgent: bool,
    ) -> Result<Job, sqlx::Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error>;

    /// Atomic view bump: the increment happens store-side so concurrent
    /// reads never lose an update. Returns the job after the bump.
    async fn increment_job_views(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error>;

    async fn get_jobs(
        &self,
        filter: &JobFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, sqlx::Error>;

    async fn get_featured_jobs(&self, limit: i64) -> Result<Vec<Job>, sqlx::Error>;

    async fn get_similar_jobs(
        &self,
        job_id: Uuid,
        category: JobCategory,
        limit: i64,
    ) -> Result<Vec<JobSummary>, sqlx::Error>;

    async fn get_category_stats(&self) -> Result<Vec<CategoryStat>, sqlx::Error>;

    async fn get_job_totals(&self) -> Result<JobTotals, sqlx::Error>;

    async fn get_jobs_by_type_counts(&self) -> Result<Vec<TypeCount>, sqlx::Error>;

    async fn get_top_categories(&self, limit: i64) -> Result<Vec<CategoryCount>, sqlx::Error>;

    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, sqlx::Error>;

    async fn set_job_featured(
        &self,
        job_id: Uuid,
        featured: bool,
        promoted_until: Option<DateTime<Utc>>,
    ) -> Result<Job, sqlx::Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        employer_id: Uuid,
        title: String,
        description: String,
        job_type: JobType,
        category: JobCategory,
        skills: Vec<String>,
        county: String,
        sub_county: Option<String>,
        ward: Option<String>,
        exact_location: Option<String>,
        salary_amount: BigDecimal,
        salary_period: SalaryPeriod,
        salary_negotiable: bool,
        urgent: bool,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs
                (employer_id, title, description, job_type, category, skills,
                 county, sub_county, ward, exact_location,
                 salary_amount, salary_period, salary_negotiable, urgent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            "#,
        )
        .bind(employer_id)
        .bind(title)
        .bind(description)
        .bind(job_type)
        .bind(category)
        .bind(skills)
        .bind(county)
        .bind(sub_county)
        .bind(ward)
        .bind(exact_location)
        .bind(salary_amount)
        .bind(salary_period)
        .bind(salary_negotiable)
        .bind(urgent)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn increment_job_views(&self, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET views = views + 1,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_jobs(
        &self,
        filter: &JobFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            FROM jobs
            WHERE ($1::text IS NULL OR county ILIKE '%' || $1 || '%')
              AND ($2::job_category IS NULL OR category = $2)
              AND ($3::job_type IS NULL OR job_type = $3)
              AND ($4::text[] IS NULL OR skills && $4)
              AND ($5::numeric IS NULL OR salary_amount >= $5)
              AND ($6::numeric IS NULL OR salary_amount <= $6)
              AND ($7::boolean IS NULL OR urgent = $7)
              AND ($8::job_status IS NULL OR status = $8)
            ORDER BY created_at DESC
            LIMIT $9 OFFSET $10
            "#,
        )
        .bind(filter.county.as_deref())
        .bind(filter.category)
        .bind(filter.job_type)
        .bind(filter.skills.as_deref())
        .bind(filter.min_salary.as_ref())
        .bind(filter.max_salary.as_ref())
        .bind(filter.urgent)
        .bind(filter.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_featured_jobs(&self, limit: i64) -> Result<Vec<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            FROM jobs
            WHERE featured = TRUE
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_similar_jobs(
        &self,
        job_id: Uuid,
        category: JobCategory,
        limit: i64,
    ) -> Result<Vec<JobSummary>, sqlx::Error> {
        sqlx::query_as::<_, JobSummary>(
            r#"
            SELECT
                id, title, county,
                salary_amount, salary_period,
                job_type, skills
            FROM jobs
            WHERE id <> $1
              AND category = $2
              AND status = 'open'::job_status
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(job_id)
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_category_stats(&self) -> Result<Vec<CategoryStat>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStat>(
            r#"
            SELECT category, COUNT(*) AS count, AVG(salary_amount) AS avg_salary
            FROM jobs
            WHERE status = 'open'::job_status
            GROUP BY category
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_job_totals(&self) -> Result<JobTotals, sqlx::Error> {
        sqlx::query_as::<_, JobTotals>(
            r#"
            SELECT
                COUNT(*) AS total_jobs,
                COALESCE(SUM(views), 0)::bigint AS total_views,
                AVG(salary_amount) AS avg_salary,
                COUNT(*) FILTER (WHERE urgent) AS urgent_jobs
            FROM jobs
            WHERE status = 'open'::job_status
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_jobs_by_type_counts(&self) -> Result<Vec<TypeCount>, sqlx::Error> {
        sqlx::query_as::<_, TypeCount>(
            r#"
            SELECT job_type, COUNT(*) AS count
            FROM jobs
            WHERE status = 'open'::job_status
            GROUP BY job_type
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_top_categories(&self, limit: i64) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM jobs
            WHERE status = 'open'::job_status
            GROUP BY category
            ORDER BY count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_job_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_job_featured(
        &self,
        job_id: Uuid,
        featured: bool,
        promoted_until: Option<DateTime<Utc>>,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET featured = $2,
                promoted_until = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, employer_id, title, description,
                job_type, category, skills,
                county, sub_county, ward, exact_location,
                salary_amount, salary_currency, salary_period, salary_negotiable,
                status, urgent, featured, promoted_until,
                views, applications_count,
                created_at, updated_at
            "#,
        )
        .bind(job_id)
        .bind(featured)
        .bind(promoted_until)
        .fetch_one(&self.pool)
        .await
    }
}
