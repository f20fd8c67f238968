use std::collections::HashMap;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    db::jobdb::{CategoryCount, CategoryStat, JobFilter, JobTotals, TypeCount},
    models::jobmodel::{Job, JobCategory, JobStatus, JobSummary, JobType, SalaryPeriod},
};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SalaryDto {
    #[validate(range(min = 0.01, message = "Salary amount must be a number greater than 0"))]
    pub amount: f64,

    pub period: SalaryPeriod,

    #[serde(default)]
    pub negotiable: bool,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobDto {
    #[validate(length(min = 5, message = "Job title must be at least 5 characters long"))]
    pub title: String,

    #[validate(length(
        min = 20,
        message = "Job description must be at least 20 characters long"
    ))]
    pub description: String,

    pub job_type: JobType,
    pub category: JobCategory,
    pub skills: Option<Vec<String>>,

    #[validate(length(min = 1, message = "Location is required"))]
    pub county: String,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub exact_location: Option<String>,

    #[validate]
    pub salary: SalaryDto,

    pub urgent: Option<bool>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct JobSearchQueryDto {
    pub county: Option<String>,
    pub category: Option<JobCategory>,
    pub job_type: Option<JobType>,
    /// Comma-separated; any overlap with the job's skill set matches.
    pub skills: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub urgent: Option<bool>,
    pub status: Option<JobStatus>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl JobSearchQueryDto {
    /// Listings default to open jobs unless the caller filters by status
    /// explicitly.
    pub fn to_filter(&self) -> Option<JobFilter> {
        let min_salary = match self.min_salary {
            Some(amount) => Some(BigDecimal::try_from(amount).ok()?),
            None => None,
        };
        let max_salary = match self.max_salary {
            Some(amount) => Some(BigDecimal::try_from(amount).ok()?),
            None => None,
        };

        let skills = self
            .skills
            .as_ref()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<String>>()
            })
            .filter(|s| !s.is_empty());

        Some(JobFilter {
            county: self.county.clone(),
            category: self.category,
            job_type: self.job_type,
            skills,
            min_salary,
            max_salary,
            urgent: self.urgent,
            status: Some(self.status.unwrap_or(JobStatus::Open)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusDto {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureJobDto {
    pub featured: bool,
    pub promoted_until: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobResponseDto {
    pub status: String,
    pub message: String,
    pub job: Job,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponseDto {
    pub status: String,
    pub count: usize,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobDetailResponseDto {
    pub status: String,
    pub job: Job,
    pub formatted_salary: String,
    pub similar_jobs: Vec<JobSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryDto {
    pub name: String,
    pub display_name: String,
    pub count: i64,
    pub avg_salary: i64,
}

impl CategoryDto {
    pub fn from_rows(rows: &[CategoryStat]) -> Vec<CategoryDto> {
        rows.iter()
            .map(|row| CategoryDto {
                name: row.category.to_str().to_string(),
                display_name: row.category.display_name(),
                count: row.count,
                avg_salary: row
                    .avg_salary
                    .as_ref()
                    .and_then(|avg| avg.to_f64())
                    .map(|avg| avg.round() as i64)
                    .unwrap_or(0),
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponseDto {
    pub status: String,
    pub categories: Vec<CategoryDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryCountDto {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatsDto {
    pub total_jobs: i64,
    pub total_views: i64,
    pub avg_salary: i64,
    pub urgent_jobs: i64,
    pub jobs_by_type: HashMap<String, i64>,
    pub top_categories: Vec<CategoryCountDto>,
}

impl JobStatsDto {
    pub fn from_parts(
        totals: &JobTotals,
        by_type: &[TypeCount],
        top_categories: &[CategoryCount],
    ) -> Self {
        JobStatsDto {
            total_jobs: totals.total_jobs,
            total_views: totals.total_views,
            avg_salary: totals
                .avg_salary
                .as_ref()
                .and_then(|avg| avg.to_f64())
                .map(|avg| avg.round() as i64)
                .unwrap_or(0),
            urgent_jobs: totals.urgent_jobs,
            jobs_by_type: by_type
                .iter()
                .map(|row| (row.job_type.to_str().to_string(), row.count))
                .collect(),
            top_categories: top_categories
                .iter()
                .map(|row| CategoryCountDto {
                    category: row.category.to_str().to_string(),
                    count: row.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatsResponseDto {
    pub status: String,
    pub stats: JobStatsDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_job() -> CreateJobDto {
        CreateJobDto {
            title: "Plumber Needed Urgently".to_string(),
            description: "Need experienced plumber to fix leaking pipes in Westlands area."
                .to_string(),
            job_type: JobType::Casual,
            category: JobCategory::Plumbing,
            skills: Some(vec!["plumbing".to_string(), "repairs".to_string()]),
            county: "Nairobi".to_string(),
            sub_county: Some("Westlands".to_string()),
            ward: None,
            exact_location: None,
            salary: SalaryDto {
                amount: 2500.0,
                period: SalaryPeriod::Day,
                negotiable: false,
            },
            urgent: Some(true),
        }
    }

    #[test]
    fn test_valid_job_passes() {
        assert!(valid_job().validate().is_ok());
    }

    #[test]
    fn test_short_title_rejected() {
        let mut dto = valid_job();
        dto.title = "Job".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_short_description_rejected() {
        let mut dto = valid_job();
        dto.description = "Too short".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_zero_salary_rejected() {
        let mut dto = valid_job();
        dto.salary.amount = 0.0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_negative_salary_rejected() {
        let mut dto = valid_job();
        dto.salary.amount = -500.0;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_search_query_defaults_to_open_jobs() {
        let query = JobSearchQueryDto::default();
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.status, Some(JobStatus::Open));
    }

    #[test]
    fn test_search_query_respects_explicit_status() {
        let query = JobSearchQueryDto {
            status: Some(JobStatus::Filled),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.status, Some(JobStatus::Filled));
    }

    #[test]
    fn test_search_query_parses_salary_range() {
        let query = JobSearchQueryDto {
            min_salary: Some(1000.0),
            max_salary: Some(5000.0),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert!(filter.min_salary.is_some());
        assert!(filter.max_salary.is_some());
    }
}
