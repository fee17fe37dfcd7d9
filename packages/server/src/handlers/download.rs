use std::collections::HashSet;
use std::io::{Cursor, Write};

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use common::storage::validate_key;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::files::{DownloadSelectedRequest, DownloadSingleRequest};
use crate::state::AppState;
use crate::utils::filename::{base_name, disambiguated_name};
use crate::utils::urls::key_from_public_url;

const ARCHIVE_NAME: &str = "search_results.zip";

/// Object key behind a public URL, if the URL belongs to the configured
/// bucket and points into `owner`'s namespace.
fn owned_key<'a>(state: &AppState, owner: &str, url: &'a str) -> Option<&'a str> {
    let key = key_from_public_url(&state.config.storage, url)?;
    let in_namespace = key
        .strip_prefix(owner)
        .is_some_and(|rest| rest.starts_with('/'));
    (in_namespace && !key.ends_with('/') && validate_key(key).is_ok()).then_some(key)
}

#[utoipa::path(
    post,
    path = "/download_single_file",
    tag = "Files",
    operation_id = "downloadSingleFile",
    summary = "Download one file",
    description = "The URL must be a public URL of the configured bucket pointing into the \
        caller's own folders. The file is returned as an attachment named `originalFileName`.",
    request_body = DownloadSingleRequest,
    responses(
        (status = 200, description = "File content, as an attachment"),
        (status = 400, description = "Missing URL or filename, or foreign URL (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Object missing (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(owner = %auth_user.email()))]
pub async fn download_single_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<DownloadSingleRequest>,
) -> Result<Response, AppError> {
    fn required(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }
    let (Some(url), Some(file_name)) = (
        required(payload.file_url.as_deref()),
        required(payload.original_file_name.as_deref()),
    ) else {
        return Err(AppError::Validation(
            "File URL and filename are required.".into(),
        ));
    };

    let key = owned_key(&state, auth_user.email(), url)
        .ok_or_else(|| AppError::Validation("Invalid file URL".into()))?;

    let (reader, info) = state.objects.get_stream(key).await?;

    let content_type = info
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, info.size)
        .header(header::CONTENT_DISPOSITION, content_disposition_value(file_name))
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    post,
    path = "/download_selected_files",
    tag = "Files",
    operation_id = "downloadSelectedFiles",
    summary = "Download several files as one zip archive",
    description = "Each URL that belongs to the caller is added under its base filename \
        (clashing names get a `(n)` suffix). URLs that are foreign or cannot be fetched are \
        skipped.",
    request_body = DownloadSelectedRequest,
    responses(
        (status = 200, description = "`search_results.zip` (application/zip)"),
        (status = 400, description = "Empty URL list (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(owner = %auth_user.email(), requested = tracing::field::Empty))]
pub async fn download_selected_files(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<DownloadSelectedRequest>,
) -> Result<Response, AppError> {
    if payload.file_urls.is_empty() {
        return Err(AppError::Validation("No file URLs provided.".into()));
    }
    tracing::Span::current().record("requested", payload.file_urls.len());

    let mut used_names = HashSet::new();
    let mut entries = Vec::new();

    for url in &payload.file_urls {
        let Some(key) = owned_key(&state, auth_user.email(), url) else {
            tracing::warn!(url = %url, "Skipping invalid file URL");
            continue;
        };

        let bytes = match state.objects.get(key).await {
            Ok((bytes, _)) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping file that could not be fetched");
                continue;
            }
        };

        let name = unique_entry_name(&mut used_names, base_name(key));
        entries.push((name, bytes));
    }

    let added = entries.len();
    let archive = tokio::task::spawn_blocking(move || build_archive(entries))
        .await
        .map_err(|e| AppError::Internal(format!("Archive task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("Failed to build archive: {e}")))?;

    tracing::info!(added, size = archive.len(), "Archive built");

    Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(header::CONTENT_LENGTH, archive.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{ARCHIVE_NAME}\""),
        )
        .body(Body::from(archive))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// `name`, or the first `name(n).ext` not yet in `used`.
fn unique_entry_name(used: &mut HashSet<String>, name: &str) -> String {
    let mut candidate = name.to_string();
    let mut counter = 0;
    while used.contains(&candidate) {
        counter += 1;
        candidate = disambiguated_name(name, counter);
    }
    used.insert(candidate.clone());
    candidate
}

fn build_archive(entries: Vec<(String, Vec<u8>)>) -> zip::result::ZipResult<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.trim().is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
