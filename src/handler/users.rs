use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{reviewdb::ReviewExt, userdb::UserFilter},
    dtos::userdtos::{
        AverageRatingsDto, CountyCountDto, CreateReviewDto, FilterUserDto,
        PopularSkillsResponseDto, ReviewResponseDto, SkillCountDto, UserDetailResponseDto,
        UserListResponseDto, UserReviewsResponseDto, UserSearchQueryDto, UserStatsDto,
        UserStatsResponseDto, VerifiedUsersDto,
    },
    error::HttpError,
    middleware::{auth, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

const DEFAULT_PAGE_LIMIT: usize = 50;

pub fn users_handler() -> Router {
    let protected_routes = Router::new()
        .route("/:user_id/reviews", post(create_review))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/", get(list_users))
        .route("/workers", get(get_workers))
        .route("/employers", get(get_employers))
        .route("/skills/popular", get(popular_skills))
        .route("/stats", get(user_stats))
        .route("/:user_id", get(get_user))
        .route("/:user_id/reviews", get(get_user_reviews))
        .merge(protected_routes)
}

fn page_params(page: Option<usize>, limit: Option<usize>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = (page.unwrap_or(1).saturating_sub(1)) * limit;
    (limit as i64, offset as i64)
}

pub async fn list_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(HttpError::validation)?;

    let filter = query.to_filter();
    let (limit, offset) = page_params(query.page, query.limit);

    let users = app_state
        .directory_service
        .list_users(&filter, limit, offset)
        .await?;

    let filtered_users = FilterUserDto::filter_users(&users);

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        count: filtered_users.len(),
        users: filtered_users,
    }))
}

pub async fn get_workers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(HttpError::validation)?;

    let filter = UserFilter {
        role: Some(UserRole::Worker),
        ..query.to_filter()
    };
    let (limit, offset) = page_params(query.page, query.limit);

    let workers = app_state
        .directory_service
        .list_users(&filter, limit, offset)
        .await?;

    let filtered_users = FilterUserDto::filter_users(&workers);

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        count: filtered_users.len(),
        users: filtered_users,
    }))
}

pub async fn get_employers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(HttpError::validation)?;

    let filter = UserFilter {
        role: Some(UserRole::Employer),
        ..query.to_filter()
    };
    let (limit, offset) = page_params(query.page, query.limit);

    let employers = app_state
        .directory_service
        .list_users(&filter, limit, offset)
        .await?;

    let filtered_users = FilterUserDto::filter_users(&employers);

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        count: filtered_users.len(),
        users: filtered_users,
    }))
}

pub async fn popular_skills(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let (total_workers, skills) = app_state.directory_service.popular_skills().await?;

    Ok(Json(PopularSkillsResponseDto {
        status: "success".to_string(),
        total_workers,
        popular_skills: SkillCountDto::from_rows(&skills),
    }))
}

pub async fn user_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.directory_service.user_stats().await?;

    Ok(Json(UserStatsResponseDto {
        status: "success".to_string(),
        stats: UserStatsDto {
            total_users: stats.total_users,
            workers: stats.workers,
            employers: stats.employers,
            workers_by_county: CountyCountDto::from_rows(&stats.workers_by_county),
            average_ratings: AverageRatingsDto {
                workers: stats.avg_worker_rating,
                employers: stats.avg_employer_rating,
            },
            verified_users: VerifiedUsersDto {
                workers: stats.verified_workers,
                employers: stats.verified_employers,
                total: stats.verified_workers + stats.verified_employers,
            },
        },
    }))
}

pub async fn get_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state.directory_service.get_user(user_id).await?;

    // Reviews are part of the public profile for workers only.
    let reviews = if user.role == UserRole::Worker {
        app_state.directory_service.reviews_for_user(user_id).await?
    } else {
        vec![]
    };

    Ok(Json(UserDetailResponseDto {
        status: "success".to_string(),
        user: FilterUserDto::filter_user(&user),
        reviews,
    }))
}

pub async fn get_user_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state.directory_service.get_user(user_id).await?;
    let reviews = app_state.directory_service.reviews_for_user(user_id).await?;

    Ok(Json(UserReviewsResponseDto {
        status: "success".to_string(),
        user_id: user.id.to_string(),
        user_name: user.name,
        average_rating: user.rating,
        total_reviews: reviews.len(),
        reviews,
    }))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    if auth.user.id == user_id {
        return Err(HttpError::bad_request("You cannot review yourself".to_string()));
    }

    let reviewee = app_state.directory_service.get_user(user_id).await?;

    let review = app_state
        .db_client
        .create_review(
            reviewee.id,
            auth.user.id,
            body.job_id,
            body.rating,
            body.comment,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ReviewResponseDto {
        status: "success".to_string(),
        message: "Review added successfully".to_string(),
        review,
    }))
}
