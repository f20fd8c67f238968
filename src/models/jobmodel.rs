use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Casual,
    Contract,
}

impl JobType {
    pub fn to_str(&self) -> &str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Casual => "casual",
            JobType::Contract => "contract",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Construction,
    Plumbing,
    Electrical,
    Cleaning,
    Delivery,
    Domestic,
    Farming,
    Security,
    Driving,
    Other,
}

impl JobCategory {
    pub fn to_str(&self) -> &str {
        match self {
            JobCategory::Construction => "construction",
            JobCategory::Plumbing => "plumbing",
            JobCategory::Electrical => "electrical",
            JobCategory::Cleaning => "cleaning",
            JobCategory::Delivery => "delivery",
            JobCategory::Domestic => "domestic",
            JobCategory::Farming => "farming",
            JobCategory::Security => "security",
            JobCategory::Driving => "driving",
            JobCategory::Other => "other",
        }
    }

    pub fn display_name(&self) -> String {
        let name = self.to_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
    Filled,
    Cancelled,
}

impl JobStatus {
    pub fn to_str(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Filled => "filled",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "salary_period", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    Hour,
    Day,
    Week,
    Month,
    Project,
}

impl SalaryPeriod {
    pub fn to_str(&self) -> &str {
        match self {
            SalaryPeriod::Hour => "hour",
            SalaryPeriod::Day => "day",
            SalaryPeriod::Week => "week",
            SalaryPeriod::Month => "month",
            SalaryPeriod::Project => "project",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub category: JobCategory,
    pub skills: Vec<String>,

    // Location
    pub county: String,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub exact_location: Option<String>,

    // Compensation
    pub salary_amount: BigDecimal,
    pub salary_currency: String,
    pub salary_period: SalaryPeriod,
    pub salary_negotiable: bool,

    pub status: JobStatus,
    pub urgent: bool,
    pub featured: bool,
    pub promoted_until: Option<DateTime<Utc>>,

    // Statistics. `applications_count` is derived data: the source of truth
    // is the set of application rows for this job.
    pub views: i64,
    pub applications_count: i64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn formatted_salary(&self) -> String {
        match self.salary_period {
            SalaryPeriod::Project => format!("KSh {}", self.salary_amount),
            period => format!("KSh {} per {}", self.salary_amount, period.to_str()),
        }
    }
}

/// Summary projection used for the similar-jobs block on a job detail view.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub county: String,
    pub salary_amount: BigDecimal,
    pub salary_period: SalaryPeriod,
    pub job_type: JobType,
    pub skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn job_with_salary(amount: &str, period: SalaryPeriod) -> Job {
        Job {
            id: Uuid::new_v4(),
            employer_id: Uuid::new_v4(),
            title: "Plumber needed".to_string(),
            description: "Fix leaking pipes in Westlands area".to_string(),
            job_type: JobType::Casual,
            category: JobCategory::Plumbing,
            skills: vec!["plumbing".to_string()],
            county: "Nairobi".to_string(),
            sub_county: None,
            ward: None,
            exact_location: None,
            salary_amount: BigDecimal::from_str(amount).unwrap(),
            salary_currency: "KES".to_string(),
            salary_period: period,
            salary_negotiable: false,
            status: JobStatus::Open,
            urgent: false,
            featured: false,
            promoted_until: None,
            views: 0,
            applications_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_formatted_salary_with_period() {
        let job = job_with_salary("2500", SalaryPeriod::Day);
        assert_eq!(job.formatted_salary(), "KSh 2500 per day");
    }

    #[test]
    fn test_formatted_salary_for_project_work() {
        let job = job_with_salary("15000", SalaryPeriod::Project);
        assert_eq!(job.formatted_salary(), "KSh 15000");
    }

    #[test]
    fn test_category_display_name() {
        assert_eq!(JobCategory::Plumbing.display_name(), "Plumbing");
        assert_eq!(JobCategory::Other.display_name(), "Other");
    }
}
