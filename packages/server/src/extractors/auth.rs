use axum::{extract::FromRequestParts, http::request::Parts};
use common::credentials;
use common::entity::user;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The token's
/// subject is resolved to the stored user record on every request, so a
/// token for a user that no longer resolves is rejected like an invalid one.
pub struct AuthUser {
    pub user: user::Model,
}

impl AuthUser {
    /// Owner key of this user's files and metadata.
    pub fn email(&self) -> &str {
        &self.user.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims =
            jwt::verify(token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;
        let user_id = claims.user_id().map_err(|_| AppError::TokenInvalid)?;

        let user = credentials::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(%user_id, "Token subject does not resolve to a user");
                AppError::TokenInvalid
            })?;

        Ok(AuthUser { user })
    }
}
