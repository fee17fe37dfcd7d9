use std::collections::HashSet;

use axum::Json;
use axum::extract::State;
use common::Category;
use common::metadata;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppQuery;
use crate::models::files::{SearchParams, SearchResponse, SearchResult};
use crate::state::AppState;
use crate::utils::urls::{object_key_from_path, public_url};

#[utoipa::path(
    get,
    path = "/search_files",
    tag = "Files",
    operation_id = "searchFiles",
    summary = "Search the caller's files",
    description = "The query is trimmed and lowercased, then matched exactly against original \
        filenames and extracted keywords across all four categories. Results are unique by record id; \
        filename matches come before keyword matches within each category.",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching records (possibly none)", body = SearchResponse),
        (status = 400, description = "Empty query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Database unavailable (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, params), fields(owner = %auth_user.email()))]
pub async fn search_files(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params
        .search_query
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::Validation("Search query is required.".into()));
    }

    let owner = auth_user.email();
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for category in Category::ALL {
        let by_name = metadata::find_by_filename(&state.db, category, owner, &query).await?;
        let by_keyword = metadata::find_by_keyword(&state.db, category, owner, &query).await?;

        for record in by_name.into_iter().chain(by_keyword) {
            if !seen.insert(record.id.clone()) {
                continue;
            }
            let url = object_key_from_path(&record.gcs_path, &state.config.storage.bucket)
                .map(|key| public_url(&state.config.storage, key));
            results.push(SearchResult::new(record, url));
        }
    }

    tracing::debug!(count = results.len(), "Search completed");

    let count = results.len();
    Ok(Json(SearchResponse {
        success: true,
        results,
        count,
    }))
}
