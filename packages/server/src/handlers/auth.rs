use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use common::credentials::{self, NewUser};
use common::entity::user;
use sea_orm::{DbErr, SqlErr};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    EmailLoginRequest, EmailSignupRequest, GoogleLoginRequest, LoginResponse, UserProfile,
    validate_login_request, validate_signup_request,
};
use crate::namespace;
use crate::state::AppState;
use crate::utils::{hash, jwt};

fn issue_session(state: &AppState, user: &user::Model) -> Result<LoginResponse, AppError> {
    let access_token = jwt::sign(
        user.id,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    Ok(LoginResponse {
        success: true,
        user: UserProfile::from(user),
        access_token,
    })
}

fn map_unique_violation(err: DbErr, conflict: AppError) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Unique constraint caught on user insert");
            conflict
        }
        _ => AppError::from(err),
    }
}

#[utoipa::path(
    post,
    path = "/google_login",
    tag = "Auth",
    operation_id = "googleLogin",
    summary = "Sign in with a Google ID token",
    description = "Verifies the Google ID token, then resolves the account by Google ID, \
        then by email (linking the Google ID onto an existing account), creating a new \
        account as a last resort. New accounts get their storage folders provisioned.",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing or rejected token (VALIDATION_ERROR, IDENTITY_REJECTED)", body = ErrorBody),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
        (status = 503, description = "Identity provider or database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn google_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<GoogleLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = payload
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Token is required.".into()))?;

    let identity = state.identity.verify(token).await?;

    if let Some(user) = credentials::find_by_google_id(&state.db, &identity.subject).await? {
        tracing::info!(user_id = %user.id, "Google login for existing account");
        return Ok(Json(issue_session(&state, &user)?));
    }

    if let Some(mut user) = credentials::find_by_email(&state.db, &identity.email).await? {
        user.google_id = Some(identity.subject);
        if identity.picture.is_some() {
            user.profile_pic_url = identity.picture;
        }
        let user = credentials::save(&state.db, user).await?;
        tracing::info!(user_id = %user.id, "Linked Google account to existing user");
        return Ok(Json(issue_session(&state, &user)?));
    }

    let user = credentials::create(
        &state.db,
        NewUser {
            email: identity.email,
            username: identity.name,
            google_id: Some(identity.subject),
            profile_pic_url: identity.picture,
            password_hash: None,
        },
    )
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            AppError::Conflict("Account was created concurrently. Try again.".into()),
        )
    })?;
    tracing::info!(user_id = %user.id, "Created account from Google login");

    namespace::provision(state.objects.as_ref(), &user.email).await;

    Ok(Json(issue_session(&state, &user)?))
}

#[utoipa::path(
    post,
    path = "/email_login",
    tag = "Auth",
    operation_id = "emailLogin",
    summary = "Sign in with email and password",
    description = "Any mismatch (unknown email, account without a password, wrong password) \
        yields the same generic error.",
    request_body = EmailLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing fields (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 503, description = "Database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn email_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<EmailLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = validate_login_request(&payload)?;

    let user = credentials::find_by_email(&state.db, &email).await?;
    let stored = user.as_ref().and_then(|u| u.password_hash.as_deref());
    let (Some(user), Some(stored)) = (user.as_ref(), stored) else {
        hash::verify_dummy(password);
        return Err(AppError::InvalidCredentials);
    };

    let is_valid = hash::verify_password(password, stored)
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(issue_session(&state, user)?))
}

#[utoipa::path(
    post,
    path = "/email_signup",
    tag = "Auth",
    operation_id = "emailSignup",
    summary = "Create an account with email and password",
    description = "If the email belongs to an account created through Google sign-in that has \
        no password yet, the password is attached to that account instead.",
    request_body = EmailSignupRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
        (status = 503, description = "Database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn email_signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<EmailSignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = validate_signup_request(&payload)?;

    let password_hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    if let Some(mut user) = credentials::find_by_email(&state.db, &email).await? {
        if user.password_hash.is_some() {
            return Err(AppError::EmailTaken);
        }
        user.password_hash = Some(password_hash);
        let user = credentials::save(&state.db, user).await?;
        tracing::info!(user_id = %user.id, "Attached password to existing account");
        return Ok((StatusCode::CREATED, Json(issue_session(&state, &user)?)));
    }

    let user = credentials::create(
        &state.db,
        NewUser {
            email,
            username: payload.name.map(|n| n.trim().to_string()),
            google_id: None,
            profile_pic_url: None,
            password_hash: Some(password_hash),
        },
    )
    .await
    .map_err(|e| map_unique_violation(e, AppError::EmailTaken))?;
    tracing::info!(user_id = %user.id, "Created account from email signup");

    namespace::provision(state.objects.as_ref(), &user.email).await;

    Ok((StatusCode::CREATED, Json(issue_session(&state, &user)?)))
}
