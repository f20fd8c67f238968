// db/reviewdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::reviewmodel::Review;

#[async_trait]
pub trait ReviewExt {
    /// Inserts the review and recomputes the reviewee's average rating and
    /// review count from the review rows, in one transaction. The stored
    /// rating is derived data; the review set is the source of truth.
    async fn create_review(
        &self,
        reviewee_id: Uuid,
        reviewer_id: Uuid,
        job_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, sqlx::Error>;

    async fn get_reviews_for_user(
        &self,
        reviewee_id: Uuid,
    ) -> Result<Vec<Review>, sqlx::Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        reviewee_id: Uuid,
        reviewer_id: Uuid,
        job_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (reviewee_id, reviewer_id, job_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, reviewee_id, reviewer_id, job_id, rating, comment, created_at
            "#,
        )
        .bind(reviewee_id)
        .bind(reviewer_id)
        .bind(job_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE users
            SET rating = (SELECT COALESCE(AVG(rating), 0) FROM reviews WHERE reviewee_id = $1),
                total_reviews = (SELECT COUNT(*) FROM reviews WHERE reviewee_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(reviewee_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(review)
    }

    async fn get_reviews_for_user(
        &self,
        reviewee_id: Uuid,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT
                id, reviewee_id, reviewer_id, job_id, rating, comment, created_at
            FROM reviews
            WHERE reviewee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(reviewee_id)
        .fetch_all(&self.pool)
        .await
    }
}
