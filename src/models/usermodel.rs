use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Worker,
    Employer,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Worker => "worker",
            UserRole::Employer => "employer",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    /// Digits-only, normalized to the 254... form before persistence.
    pub phone: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,

    // Location
    pub county: String,
    pub sub_county: Option<String>,
    pub ward: Option<String>,

    // Worker fields
    pub skills: Vec<String>,

    // Ratings
    pub rating: f64,
    pub total_reviews: i32,

    // Verification
    pub phone_verified: bool,
    pub id_verified: bool,
    pub email_verified: bool,

    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub verification_expires: Option<DateTime<Utc>>,

    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
