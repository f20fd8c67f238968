// db/userdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::usermodel::{User, UserRole};

/// Directory filter over users. Every field is optional; unset fields do not
/// constrain the result set.
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub county: Option<String>,
    /// A worker matches only when it has ALL of the requested skills.
    pub skills: Option<Vec<String>>,
    pub min_rating: Option<f64>,
    pub search: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SkillCount {
    pub skill: String,
    pub count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CountyCount {
    pub county: String,
    pub count: i64,
}

#[async_trait]
pub trait UserExt {
    #[allow(clippy::too_many_arguments)]
    async fn save_user(
        &self,
        name: String,
        phone: String,
        email: Option<String>,
        password: String,
        role: UserRole,
        county: String,
        skills: Vec<String>,
        verification_code: String,
        verification_expires: DateTime<Utc>,
    ) -> Result<User, sqlx::Error>;

    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        county: Option<String>,
        sub_county: Option<String>,
        ward: Option<String>,
        skills: Option<Vec<String>>,
    ) -> Result<User, sqlx::Error>;

    async fn set_verification_code(
        &self,
        user_id: Uuid,
        code: String,
        expires_at: DateTime<Utc>,
    ) -> Result<User, sqlx::Error>;

    async fn mark_phone_verified(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error>;

    async fn update_last_login(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn get_popular_skills(&self, limit: i64) -> Result<Vec<SkillCount>, sqlx::Error>;

    async fn count_users_by_role(&self, role: UserRole) -> Result<i64, sqlx::Error>;

    async fn get_workers_by_county(&self) -> Result<Vec<CountyCount>, sqlx::Error>;

    async fn avg_rating_by_role(&self, role: UserRole) -> Result<Option<f64>, sqlx::Error>;

    async fn count_verified_by_role(&self, role: UserRole) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn save_user(
        &self,
        name: String,
        phone: String,
        email: Option<String>,
        password: String,
        role: UserRole,
        county: String,
        skills: Vec<String>,
        verification_code: String,
        verification_expires: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (name, phone, email, password, role, county, skills,
                 verification_code, verification_expires)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(password)
        .bind(role)
        .bind(county)
        .bind(skills)
        .bind(verification_code)
        .bind(verification_expires)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, phone, email, password, role,
                    county, sub_county, ward, skills,
                    rating, total_reviews,
                    phone_verified, id_verified, email_verified,
                    verification_code, verification_expires,
                    active, last_login,
                    created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(phone) = phone {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, phone, email, password, role,
                    county, sub_county, ward, skills,
                    rating, total_reviews,
                    phone_verified, id_verified, email_verified,
                    verification_code, verification_expires,
                    active, last_login,
                    created_at, updated_at
                FROM users
                WHERE phone = $1
                "#,
            )
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, phone, email, password, role,
                    county, sub_county, ward, skills,
                    rating, total_reviews,
                    phone_verified, id_verified, email_verified,
                    verification_code, verification_expires,
                    active, last_login,
                    created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            FROM users
            WHERE active = TRUE
              AND ($1::user_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR county ILIKE '%' || $2 || '%')
              AND ($3::text[] IS NULL OR skills @> $3)
              AND ($4::float8 IS NULL OR rating >= $4)
              AND ($5::text IS NULL OR name ILIKE '%' || $5 || '%')
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(filter.role)
        .bind(filter.county.as_deref())
        .bind(filter.skills.as_deref())
        .bind(filter.min_rating)
        .bind(filter.search.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE active = TRUE")
            .fetch_one(&self.pool)
            .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        county: Option<String>,
        sub_county: Option<String>,
        ward: Option<String>,
        skills: Option<Vec<String>>,
    ) -> Result<User, sqlx::Error> {
        // Phone, password and verification state are immutable through this
        // path; they have their own dedicated updates.
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                county = COALESCE($4, county),
                sub_county = COALESCE($5, sub_county),
                ward = COALESCE($6, ward),
                skills = COALESCE($7, skills),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(county)
        .bind(sub_county)
        .bind(ward)
        .bind(skills)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_verification_code(
        &self,
        user_id: Uuid,
        code: String,
        expires_at: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET verification_code = $2,
                verification_expires = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_phone_verified(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET phone_verified = TRUE,
                verification_code = NULL,
                verification_expires = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = $2,
                verification_code = NULL,
                verification_expires = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_last_login(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET last_login = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, name, phone, email, password, role,
                county, sub_county, ward, skills,
                rating, total_reviews,
                phone_verified, id_verified, email_verified,
                verification_code, verification_expires,
                active, last_login,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_popular_skills(&self, limit: i64) -> Result<Vec<SkillCount>, sqlx::Error> {
        sqlx::query_as::<_, SkillCount>(
            r#"
            SELECT skill, COUNT(*) AS count
            FROM users, unnest(skills) AS skill
            WHERE role = 'worker'::user_role AND active = TRUE
            GROUP BY skill
            ORDER BY count DESC, skill ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role = $1 AND active = TRUE",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_workers_by_county(&self) -> Result<Vec<CountyCount>, sqlx::Error> {
        sqlx::query_as::<_, CountyCount>(
            r#"
            SELECT county, COUNT(*) AS count
            FROM users
            WHERE role = 'worker'::user_role AND active = TRUE
            GROUP BY county
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn avg_rating_by_role(&self, role: UserRole) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(rating) FROM users WHERE role = $1 AND active = TRUE",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn count_verified_by_role(&self, role: UserRole) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role = $1 AND active = TRUE
              AND phone_verified = TRUE AND id_verified = TRUE
            "#,
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }
}
