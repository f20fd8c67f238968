use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::applicationmodel::{Application, ApplicationStatus};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ApplyJobDto {
    #[validate(length(max = 1000, message = "Cover message must not exceed 1000 characters"))]
    pub cover_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RespondApplicationDto {
    /// accepted or rejected; anything else is refused by the service.
    pub status: ApplicationStatus,

    #[validate(length(max = 1000, message = "Response message must not exceed 1000 characters"))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationResponseDto {
    pub status: String,
    pub message: String,
    pub application: Application,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationListResponseDto {
    pub status: String,
    pub count: usize,
    pub applications: Vec<Application>,
}
