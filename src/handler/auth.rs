use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{
        FilterUserDto, ForgotPasswordDto, LoginUserDto, RegisterUserDto, ResetPasswordDto,
        Response, UpdateProfileDto, UserData, UserLoginResponseDto, UserResponseDto,
        VerifyPhoneDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::{auth, JWTAuthMiddeware},
    service::error::is_unique_violation,
    utils::{otp_generator::generate_otp, password, phone::normalize_phone, token},
    AppState,
};

const VERIFICATION_CODE_MINUTES: i64 = 10;
const RESET_CODE_MINUTES: i64 = 30;

pub fn auth_handler() -> Router {
    let protected_routes = Router::new()
        .route("/me", get(get_me))
        .route("/verify-phone", post(verify_phone))
        .route("/resend-verification", post(resend_verification))
        .route("/update-profile", put(update_profile))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .merge(protected_routes)
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let phone = normalize_phone(&body.phone)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::InvalidPhoneFormat.to_string()))?;

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&phone), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing_user.is_some() {
        return Err(HttpError::unique_constraint_violation(
            ErrorMessage::PhoneExist.to_string(),
        ));
    }

    if let Some(ref email) = body.email {
        let email_user = app_state
            .db_client
            .get_user(None, None, Some(email))
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        if email_user.is_some() {
            return Err(HttpError::unique_constraint_violation(
                ErrorMessage::EmailExist.to_string(),
            ));
        }
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let verification_code = generate_otp();
    let verification_expires = Utc::now() + Duration::minutes(VERIFICATION_CODE_MINUTES);

    let user = app_state
        .db_client
        .save_user(
            body.name,
            phone.clone(),
            body.email,
            hashed_password,
            body.role,
            body.county,
            body.skills.unwrap_or_default(),
            verification_code.clone(),
            verification_expires,
        )
        .await
        .map_err(|e| {
            // Two concurrent registrations race on the unique phone index;
            // the loser lands here.
            if is_unique_violation(&e) {
                HttpError::unique_constraint_violation(ErrorMessage::PhoneExist.to_string())
            } else {
                HttpError::server_error(e.to_string())
            }
        })?;

    // Delivery must not block or fail registration.
    let notification_service = app_state.notification_service.clone();
    tokio::spawn(async move {
        if let Err(e) = notification_service
            .send_verification_code(&phone, &verification_code)
            .await
        {
            tracing::error!("Failed to send verification SMS: {}", e);
        }
    });

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let filtered_user = FilterUserDto::filter_user(&user);

    Ok(Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
        user: filtered_user,
    }))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let phone = normalize_phone(&body.phone)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&phone), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !user.active {
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountDeactivated.to_string(),
        ));
    }

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let user = app_state
        .db_client
        .update_last_login(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
        user: FilterUserDto::filter_user(&user),
    });

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie".to_string()))?,
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn verify_phone(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<VerifyPhoneDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let user = &auth.user;

    if user.phone_verified {
        return Err(HttpError::bad_request(
            "Phone number is already verified".to_string(),
        ));
    }

    match &user.verification_code {
        Some(code) if *code == body.code => {}
        _ => {
            return Err(HttpError::bad_request(
                "Invalid verification code".to_string(),
            ));
        }
    }

    match user.verification_expires {
        Some(expires_at) if expires_at > Utc::now() => {}
        _ => {
            return Err(HttpError::bad_request(
                "Verification code has expired".to_string(),
            ));
        }
    }

    app_state
        .db_client
        .mark_phone_verified(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(Response {
        status: "success",
        message: "Phone number verified successfully".to_string(),
    }))
}

pub async fn resend_verification(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let user = &auth.user;

    if user.phone_verified {
        return Err(HttpError::bad_request(
            "Phone number is already verified".to_string(),
        ));
    }

    let verification_code = generate_otp();
    let verification_expires = Utc::now() + Duration::minutes(VERIFICATION_CODE_MINUTES);

    app_state
        .db_client
        .set_verification_code(user.id, verification_code.clone(), verification_expires)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let notification_service = app_state.notification_service.clone();
    let phone = user.phone.clone();
    tokio::spawn(async move {
        if let Err(e) = notification_service
            .send_verification_code(&phone, &verification_code)
            .await
        {
            tracing::error!("Failed to resend verification SMS: {}", e);
        }
    });

    Ok(Json(Response {
        status: "success",
        message: "Verification code resent successfully".to_string(),
    }))
}

pub async fn forgot_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let phone = normalize_phone(&body.phone)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::InvalidPhoneFormat.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&phone), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or_else(|| {
        HttpError::not_found("No user found with this phone number".to_string())
    })?;

    let reset_code = generate_otp();
    let expires_at = Utc::now() + Duration::minutes(RESET_CODE_MINUTES);

    app_state
        .db_client
        .set_verification_code(user.id, reset_code.clone(), expires_at)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let notification_service = app_state.notification_service.clone();
    tokio::spawn(async move {
        if let Err(e) = notification_service
            .send_password_reset_code(&phone, &reset_code)
            .await
        {
            tracing::error!("Failed to send password reset SMS: {}", e);
        }
    });

    Ok(Json(Response {
        status: "success",
        message: "Password reset code sent to your phone".to_string(),
    }))
}

pub async fn reset_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let phone = normalize_phone(&body.phone)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::InvalidPhoneFormat.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&phone), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or_else(|| {
        HttpError::not_found("No user found with this phone number".to_string())
    })?;

    let code_valid = matches!(
        (&user.verification_code, user.verification_expires),
        (Some(code), Some(expires_at)) if *code == body.code && expires_at > Utc::now()
    );

    if !code_valid {
        return Err(HttpError::bad_request(
            "Invalid or expired reset code".to_string(),
        ));
    }

    let hashed_password = password::hash(&body.new_password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(user.id, hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(Response {
        status: "success",
        message: "Password has been successfully reset. You can now login with your new password."
            .to_string(),
    }))
}

pub async fn get_me(
    Extension(_app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&auth.user);

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    }))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(HttpError::validation)?;

    let user = app_state
        .db_client
        .update_user_profile(
            auth.user.id,
            body.name,
            body.email,
            body.county,
            body.sub_county,
            body.ward,
            body.skills,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
            } else {
                HttpError::server_error(e.to_string())
            }
        })?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}
