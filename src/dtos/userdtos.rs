use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::{CountyCount, SkillCount, UserFilter},
    models::{
        reviewmodel::Review,
        usermodel::{User, UserRole},
    },
    utils::phone::is_valid_kenyan_phone,
};

fn validate_kenyan_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if is_valid_kenyan_phone(phone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_phone"))
    }
}

fn validate_registration_role(role: &UserRole) -> Result<(), validator::ValidationError> {
    match role {
        UserRole::Worker | UserRole::Employer => Ok(()),
        _ => Err(validator::ValidationError::new("invalid_role")),
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(custom = "validate_registration_role")]
    pub role: UserRole,

    #[validate(length(min = 2, message = "Name must be at least 2 characters long"))]
    pub name: String,

    #[validate(custom = "validate_kenyan_phone")]
    pub phone: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,

    #[validate(length(min = 1, message = "Location is required"))]
    pub county: String,

    pub skills: Option<Vec<String>>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyPhoneDto {
    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordDto {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResetPasswordDto {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    #[validate(length(equal = 6, message = "Reset code must be 6 digits"))]
    pub code: String,

    #[validate(length(min = 6, message = "New password must be at least 6 characters long"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "passwords do not match"))]
    pub new_password_confirm: String,
}

/// Profile updates never touch phone, password or verification state; those
/// have dedicated flows.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(min = 2, message = "Name must be at least 2 characters long"))]
    pub name: Option<String>,

    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,

    pub county: Option<String>,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedFlagsDto {
    pub phone: bool,
    pub id: bool,
    pub email: bool,
}

/// Public projection of a user. Credential fields, verification codes and
/// the email address are never exposed here.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub county: String,
    pub sub_county: Option<String>,
    pub ward: Option<String>,
    pub skills: Vec<String>,
    pub rating: f64,
    pub total_reviews: i32,
    #[serde(rename = "isVerified")]
    pub is_verified: VerifiedFlagsDto,
    pub active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            phone: user.phone.to_owned(),
            role: user.role.to_str().to_string(),
            county: user.county.to_owned(),
            sub_county: user.sub_county.clone(),
            ward: user.ward.clone(),
            skills: user.skills.clone(),
            rating: user.rating,
            total_reviews: user.total_reviews,
            is_verified: VerifiedFlagsDto {
                phone: user.phone_verified,
                id: user.id_verified,
                email: user.email_verified,
            },
            active: user.active,
            created_at: user.created_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub count: usize,
    pub users: Vec<FilterUserDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub user: FilterUserDto,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct UserSearchQueryDto {
    pub role: Option<UserRole>,
    pub county: Option<String>,
    /// Comma-separated skill list; a worker matches only with ALL of them.
    pub skills: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f64>,
    pub search: Option<String>,
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl UserSearchQueryDto {
    pub fn to_filter(&self) -> UserFilter {
        let skills = self.skills.as_ref().map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect::<Vec<String>>()
        });

        UserFilter {
            role: self.role,
            county: self.county.clone(),
            skills: skills.filter(|s| !s.is_empty()),
            min_rating: self.min_rating,
            search: self.search.clone(),
        }
    }
}

// Review DTOs

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 500, message = "Comment must not exceed 500 characters"))]
    pub comment: Option<String>,

    pub job_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponseDto {
    pub status: String,
    pub message: String,
    pub review: Review,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserReviewsResponseDto {
    pub status: String,
    pub user_id: String,
    pub user_name: String,
    pub average_rating: f64,
    pub total_reviews: usize,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDetailResponseDto {
    pub status: String,
    pub user: FilterUserDto,
    pub reviews: Vec<Review>,
}

// Directory aggregates

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillCountDto {
    pub skill: String,
    pub count: i64,
}

impl SkillCountDto {
    pub fn from_rows(rows: &[SkillCount]) -> Vec<SkillCountDto> {
        rows.iter()
            .map(|row| SkillCountDto {
                skill: row.skill.clone(),
                count: row.count,
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PopularSkillsResponseDto {
    pub status: String,
    pub total_workers: i64,
    pub popular_skills: Vec<SkillCountDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountyCountDto {
    pub county: String,
    pub count: i64,
}

impl CountyCountDto {
    pub fn from_rows(rows: &[CountyCount]) -> Vec<CountyCountDto> {
        rows.iter()
            .map(|row| CountyCountDto {
                county: row.county.clone(),
                count: row.count,
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AverageRatingsDto {
    pub workers: f64,
    pub employers: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedUsersDto {
    pub workers: i64,
    pub employers: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsDto {
    pub total_users: i64,
    pub workers: i64,
    pub employers: i64,
    pub workers_by_county: Vec<CountyCountDto>,
    pub average_ratings: AverageRatingsDto,
    pub verified_users: VerifiedUsersDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsResponseDto {
    pub status: String,
    pub stats: UserStatsDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegisterUserDto {
        RegisterUserDto {
            role: UserRole::Worker,
            name: "John Kamau".to_string(),
            phone: "0712345678".to_string(),
            email: Some("john.kamau@example.com".to_string()),
            password: "secret123".to_string(),
            county: "Nairobi".to_string(),
            skills: Some(vec!["plumbing".to_string()]),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn test_invalid_phone_rejected() {
        let mut dto = valid_registration();
        dto.phone = "12345".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut dto = valid_registration();
        dto.password = "abc".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_admin_registration_rejected() {
        let mut dto = valid_registration();
        dto.role = UserRole::Admin;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_search_query_skill_csv_parsing() {
        let query = UserSearchQueryDto {
            skills: Some("Plumbing, pipe fitting ,,repairs".to_string()),
            ..Default::default()
        };
        let filter = query.to_filter();
        assert_eq!(
            filter.skills,
            Some(vec![
                "plumbing".to_string(),
                "pipe fitting".to_string(),
                "repairs".to_string()
            ])
        );
    }

    #[test]
    fn test_search_query_empty_skills_become_none() {
        let query = UserSearchQueryDto {
            skills: Some(" , ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter().skills, None);
    }

    #[test]
    fn test_review_rating_bounds() {
        let mut dto = CreateReviewDto {
            rating: 5,
            comment: None,
            job_id: None,
        };
        assert!(dto.validate().is_ok());

        dto.rating = 0;
        assert!(dto.validate().is_err());

        dto.rating = 6;
        assert!(dto.validate().is_err());
    }
}
