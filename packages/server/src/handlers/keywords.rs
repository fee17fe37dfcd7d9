use axum::Json;
use axum::extract::State;
use common::keywords;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::files::{FrequentKeywordsResponse, KeywordEntry};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/frequent_keywords",
    tag = "Files",
    operation_id = "frequentKeywords",
    summary = "Most frequent keywords across the caller's files",
    description = "Counts are computed by the offline aggregator; a user it has not \
        processed yet gets an empty list.",
    responses(
        (status = 200, description = "Keywords, most frequent first", body = FrequentKeywordsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user.id))]
pub async fn frequent_keywords(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<FrequentKeywordsResponse>, AppError> {
    let counts = keywords::top_counts(
        &state.db,
        auth_user.user.id,
        state.config.search.frequent_keywords_limit,
    )
    .await?;

    Ok(Json(FrequentKeywordsResponse {
        success: true,
        keywords: counts.into_iter().map(KeywordEntry::from).collect(),
    }))
}
