use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        applicationdtos::{
            ApplicationListResponseDto, ApplicationResponseDto, ApplyJobDto,
            RespondApplicationDto,
        },
        jobdtos::{
            CategoriesResponseDto, CategoryDto, CreateJobDto, FeatureJobDto,
            JobDetailResponseDto, JobListResponseDto, JobResponseDto, JobSearchQueryDto,
            JobStatsDto, JobStatsResponseDto, UpdateJobStatusDto,
        },
        userdtos::Response,
    },
    error::HttpError,
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

const DEFAULT_PAGE_LIMIT: usize = 50;

pub fn jobs_handler() -> Router {
    let protected_routes = Router::new()
        .route(
            "/",
            post(create_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Employer, UserRole::Admin])
            })),
        )
        .route(
            "/:job_id/status",
            put(update_job_status).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Employer, UserRole::Admin])
            })),
        )
        .route(
            "/:job_id/feature",
            put(feature_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/:job_id/apply",
            post(apply_for_job).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Worker])
            })),
        )
        .route(
            "/:job_id/applications",
            get(get_job_applications).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Employer, UserRole::Admin])
            })),
        )
        .route(
            "/applications/me",
            get(get_my_applications).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Worker])
            })),
        )
        .route(
            "/applications/:application_id/respond",
            put(respond_to_application).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Employer, UserRole::Admin])
            })),
        )
        .route(
            "/applications/:application_id/withdraw",
            put(withdraw_application).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Worker])
            })),
        )
        .route(
            "/applications/:application_id",
            delete(remove_application).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Worker])
            })),
        )
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/", get(list_jobs))
        .route("/featured", get(get_featured_jobs))
        .route("/categories", get(get_categories))
        .route("/stats", get(get_job_stats))
        .route("/:job_id", get(get_job))
        .merge(protected_routes)
}

pub async fn list_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<JobSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(HttpError::validation)?;

    let filter = query
        .to_filter()
        .ok_or_else(|| HttpError::bad_request("Invalid salary range".to_string()))?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let offset = (query.page.unwrap_or(1).saturating_sub(1)) * limit;

    let jobs = app_state
        .job_service
        .list_jobs(&filter, limit as i64, offset as i64)
        .await?;

    Ok(Json(JobListResponseDto {
        status: "success".to_string(),
        count: jobs.len(),
        jobs,
    }))
}

pub async fn get_featured_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.job_service.featured_jobs().await?;

    Ok(Json(JobListResponseDto {
        status: "success".to_string(),
        count: jobs.len(),
        jobs,
    }))
}

pub async fn get_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state.job_service.categories().await?;

    Ok(Json(CategoriesResponseDto {
        status: "success".to_string(),
        categories: CategoryDto::from_rows(&categories),
    }))
}

pub async fn get_job_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.job_service.stats().await?;

    Ok(Json(JobStatsResponseDto {
        status: "success".to_string(),
        stats: JobStatsDto::from_parts(&stats.totals, &stats.by_type, &stats.top_categories),
    }))
}

/// Fetching a job is a counted view: the job returned here already includes
/// this request's view increment.
pub async fn get_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (job, similar_jobs) = app_state.job_service.get_job(job_id).await?;

    let formatted_salary = job.formatted_salary();

    Ok(Json(JobDetailResponseDto {
        status: "success".to_string(),
        job,
        formatted_salary,
        similar_jobs,
    }))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let job = app_state
        .job_service
        .create_job(auth.user.id, body)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        message: "Job posted successfully".to_string(),
        job,
    }))
}

pub async fn update_job_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<UpdateJobStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .update_status(job_id, auth.user.id, body.status)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        message: "Job status updated successfully".to_string(),
        job,
    }))
}

pub async fn feature_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<FeatureJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .set_featured(job_id, body.featured, body.promoted_until)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        message: "Job promotion updated".to_string(),
        job,
    }))
}

pub async fn apply_for_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<ApplyJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let application = app_state
        .application_service
        .apply(job_id, auth.user.id, body.cover_message)
        .await?;

    Ok(Json(ApplicationResponseDto {
        status: "success".to_string(),
        message: "Application submitted successfully!".to_string(),
        application,
    }))
}

pub async fn get_job_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let applications = app_state
        .application_service
        .applications_for_job(job_id, auth.user.id)
        .await?;

    Ok(Json(ApplicationListResponseDto {
        status: "success".to_string(),
        count: applications.len(),
        applications,
    }))
}

pub async fn get_my_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let applications = app_state
        .application_service
        .applications_for_worker(auth.user.id)
        .await?;

    Ok(Json(ApplicationListResponseDto {
        status: "success".to_string(),
        count: applications.len(),
        applications,
    }))
}

pub async fn respond_to_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
    Json(body): Json<RespondApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let application = app_state
        .application_service
        .respond(application_id, auth.user.id, body.status, body.message)
        .await?;

    Ok(Json(ApplicationResponseDto {
        status: "success".to_string(),
        message: "Application updated successfully".to_string(),
        application,
    }))
}

pub async fn withdraw_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .application_service
        .withdraw(application_id, auth.user.id)
        .await?;

    Ok(Json(ApplicationResponseDto {
        status: "success".to_string(),
        message: "Application withdrawn".to_string(),
        application,
    }))
}

pub async fn remove_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(application_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .application_service
        .remove(application_id, auth.user.id)
        .await?;

    Ok(Json(Response {
        status: "success",
        message: "Application removed".to_string(),
    }))
}
