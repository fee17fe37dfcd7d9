use std::path::{Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::filename::has_parent_segment;

const ENTRY_PAGE: &str = "index.html";

/// Serve the client application's entry page.
#[instrument(skip(state))]
pub async fn serve_index(State(state): State<AppState>) -> Result<Response, AppError> {
    serve_file(&state.config.server.static_dir.join(ENTRY_PAGE)).await
}

/// Serve a client asset, falling back to the entry page for unknown paths.
#[instrument(skip(state))]
pub async fn serve_asset(
    State(state): State<AppState>,
    Path(asset_path): Path<String>,
) -> Result<Response, AppError> {
    let root = &state.config.server.static_dir;
    let target = resolve_asset(root, &asset_path).await;
    serve_file(&target.unwrap_or_else(|| root.join(ENTRY_PAGE))).await
}

/// Existing regular file under `root` addressed by `asset_path`.
async fn resolve_asset(root: &FsPath, asset_path: &str) -> Option<PathBuf> {
    let trimmed = asset_path.trim_start_matches('/');
    if trimmed.is_empty() || has_parent_segment(trimmed) || trimmed.contains('\0') {
        return None;
    }
    let candidate = root.join(trimmed);
    match tokio::fs::metadata(&candidate).await {
        Ok(meta) if meta.is_file() => Some(candidate),
        _ => None,
    }
}

async fn serve_file(path: &FsPath) -> Result<Response, AppError> {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Page not found".into()));
        }
        Err(e) => return Err(AppError::Internal(format!("IO error: {e}"))),
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}
