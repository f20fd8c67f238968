// service/directory_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        db::DBClient,
        reviewdb::ReviewExt,
        userdb::{CountyCount, SkillCount, UserExt, UserFilter},
    },
    models::{reviewmodel::Review, usermodel::{User, UserRole}},
    service::error::ServiceError,
};

const POPULAR_SKILLS_LIMIT: i64 = 10;

#[derive(Debug)]
pub struct UserStats {
    pub total_users: i64,
    pub workers: i64,
    pub employers: i64,
    pub workers_by_county: Vec<CountyCount>,
    pub avg_worker_rating: f64,
    pub avg_employer_rating: f64,
    pub verified_workers: i64,
    pub verified_employers: i64,
}

/// Read-side directory over users: filtering, popular skills and derived
/// statistics. Every operation is side-effect free and may run concurrently
/// with lifecycle mutations without locking.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    db_client: Arc<DBClient>,
}

impl DirectoryService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, ServiceError> {
        let users = self.db_client.get_users(filter, limit, offset).await?;
        Ok(users)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ServiceError> {
        let user = self
            .db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;
        Ok(user)
    }

    pub async fn reviews_for_user(&self, user_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        // Resolve the user first so a bad id is a 404 rather than an empty
        // list.
        let user = self.get_user(user_id).await?;
        let reviews = self.db_client.get_reviews_for_user(user.id).await?;
        Ok(reviews)
    }

    /// Frequency count of each skill string across all workers, descending,
    /// top 10. Returns the worker total alongside for the response envelope.
    pub async fn popular_skills(&self) -> Result<(i64, Vec<SkillCount>), ServiceError> {
        let total_workers = self.db_client.count_users_by_role(UserRole::Worker).await?;
        let skills = self
            .db_client
            .get_popular_skills(POPULAR_SKILLS_LIMIT)
            .await?;
        Ok((total_workers, skills))
    }

    pub async fn user_stats(&self) -> Result<UserStats, ServiceError> {
        let total_users = self.db_client.get_user_count().await?;
        let workers = self.db_client.count_users_by_role(UserRole::Worker).await?;
        let employers = self
            .db_client
            .count_users_by_role(UserRole::Employer)
            .await?;
        let workers_by_county = self.db_client.get_workers_by_county().await?;
        let avg_worker_rating = self
            .db_client
            .avg_rating_by_role(UserRole::Worker)
            .await?
            .unwrap_or(0.0);
        let avg_employer_rating = self
            .db_client
            .avg_rating_by_role(UserRole::Employer)
            .await?
            .unwrap_or(0.0);
        let verified_workers = self
            .db_client
            .count_verified_by_role(UserRole::Worker)
            .await?;
        let verified_employers = self
            .db_client
            .count_verified_by_role(UserRole::Employer)
            .await?;

        Ok(UserStats {
            total_users,
            workers,
            employers,
            workers_by_county,
            avg_worker_rating,
            avg_employer_rating,
            verified_workers,
            verified_employers,
        })
    }
}
