use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use common::Category;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::files::UploadResponse;
use crate::namespace;
use crate::state::AppState;
use crate::utils::filename::upload_name;

pub fn upload_body_limit(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

/// A `file` part read into memory.
struct PendingFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/upload_files",
    tag = "Files",
    operation_id = "uploadFiles",
    summary = "Upload one or more files",
    description = "Each repeated `file` multipart part is stored under \
        `{email}/{category}/{filename}`, the category being derived from the part's \
        content type. A taken name gets a `(n)` suffix before its extension. \
        Files are written in order; a failure leaves earlier files in place.",
    request_body(content_type = "multipart/form-data", description = "Repeated `file` parts"),
    responses(
        (status = 200, description = "Files stored", body = UploadResponse),
        (status = 400, description = "No files or invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "No free name left (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(owner = %auth_user.email()))]
pub async fn upload_files(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut pending = Vec::new();
    let mut seen_part = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // A form with no parts is only a closing boundary, which the parser rejects.
            Err(e) if !seen_part => {
                tracing::debug!(error = %e, "Multipart body has no parts");
                break;
            }
            Err(e) => return Err(AppError::Validation(format!("Multipart error: {e}"))),
        };
        seen_part = true;

        if field.name() != Some("file") {
            continue;
        }
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if raw_name.trim().is_empty() {
            continue;
        }

        let name = upload_name(&raw_name)
            .map_err(|e| AppError::Validation(e.to_string()))?
            .to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;

        pending.push(PendingFile {
            name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if pending.is_empty() {
        return Err(AppError::Validation("No selected files".into()));
    }

    let email = auth_user.email();
    let mut uploaded_files = Vec::with_capacity(pending.len());

    for file in pending {
        let category = Category::from_mime(&file.content_type);
        let (key, stored_name) = namespace::resolve_free_name(
            state.objects.as_ref(),
            email,
            category,
            &file.name,
            state.config.upload.max_name_probes,
        )
        .await?;

        state
            .objects
            .put(&key, &file.bytes, &file.content_type)
            .await?;
        tracing::info!(key = %key, size = file.bytes.len(), "Stored upload");

        uploaded_files.push(stored_name);
    }

    Ok(Json(UploadResponse {
        success: true,
        message: format!("{} file(s) uploaded successfully.", uploaded_files.len()),
        uploaded_files,
    }))
}
