use common::entity::user;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for Google sign-in.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct GoogleLoginRequest {
    /// Google ID token obtained by the client.
    #[schema(example = "eyJhbGciOiJSUzI1NiIsImtpZCI6...")]
    #[serde(default)]
    pub token: Option<String>,
}

/// Request body for email/password login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct EmailLoginRequest {
    #[schema(example = "alice@example.com")]
    #[serde(default)]
    pub email: Option<String>,
    #[schema(example = "s3cure_P@ss!")]
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for email/password signup.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct EmailSignupRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Display name. Defaults to the local part of the email.
    #[schema(example = "Alice")]
    #[serde(default)]
    pub name: Option<String>,
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && email.len() <= 254
                && !email.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("A valid email address is required.".into()))
    }
}

/// Validates a login body and returns the normalized email and password.
pub fn validate_login_request(payload: &EmailLoginRequest) -> Result<(String, &str), AppError> {
    let email = payload.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required.".into(),
        ));
    }
    Ok((email, password))
}

/// Validates a signup body and returns the normalized email.
pub fn validate_signup_request(payload: &EmailSignupRequest) -> Result<String, AppError> {
    let email = normalize_email(&payload.email);
    validate_email(&email)?;
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    if let Some(name) = &payload.name
        && name.chars().count() > 64
    {
        return Err(AppError::Validation("Name must be at most 64 characters".into()));
    }
    Ok(email)
}

/// Public profile returned after login.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "https://lh3.googleusercontent.com/a/photo")]
    pub picture: Option<String>,
}

impl From<&user::Model> for UserProfile {
    fn from(user: &user::Model) -> Self {
        Self {
            email: user.email.clone(),
            name: user.username.clone(),
            picture: user.profile_pic_url.clone(),
        }
    }
}

/// Successful login or signup response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    #[schema(example = true)]
    pub success: bool,
    pub user: UserProfile,
    /// JWT bearer token valid for 24 hours by default.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
}
