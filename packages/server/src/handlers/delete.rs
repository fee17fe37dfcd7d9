use axum::Json;
use axum::extract::State;
use common::metadata;
use common::storage::StorageError;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::files::{DeleteFileRequest, MessageResponse};
use crate::state::AppState;
use crate::utils::urls::object_key_from_path;

#[utoipa::path(
    delete,
    path = "/delete_file",
    tag = "Files",
    operation_id = "deleteFile",
    summary = "Delete one of the caller's files",
    description = "Deletes the oldest record owned by the caller with this original filename, \
        searching images, videos, audios and others in that order. The stored object is \
        removed first (a missing object is tolerated), then the metadata record. The two \
        deletions are not atomic.",
    request_body = DeleteFileRequest,
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Missing filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such file for this user (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(owner = %auth_user.email()))]
pub async fn delete_file(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<DeleteFileRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let file_name = payload
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("Filename is required.".into()))?;

    let record = metadata::find_first_by_filename(&state.db, auth_user.email(), file_name)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found or permission denied.".into()))?;

    match object_key_from_path(&record.gcs_path, &state.config.storage.bucket) {
        Some(key) => match state.objects.delete(key).await {
            Ok(true) => tracing::info!(key = %key, "Deleted stored object"),
            Ok(false) | Err(StorageError::NotFound(_)) => {
                tracing::warn!(key = %key, "Stored object already absent")
            }
            Err(e) => return Err(e.into()),
        },
        None => tracing::warn!(
            path = %record.gcs_path,
            "Blob path outside the configured bucket, deleting metadata only"
        ),
    }

    metadata::delete_record(&state.db, &record.id).await?;
    tracing::info!(record_id = %record.id, "Deleted metadata record");

    Ok(Json(MessageResponse {
        success: true,
        message: format!("File '{file_name}' deleted successfully."),
    }))
}
