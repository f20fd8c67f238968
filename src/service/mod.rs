pub mod application_service;
pub mod directory_service;
pub mod error;
pub mod job_service;
pub mod notification_service;
