use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::{ffi::OsStr, path::Path};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorResponse},
    models::{NewFile, PresignedUrlRequest, PresignedUrlResponse},
};

/// get_presigned_url
///
/// [Authenticated Route] Registers an upload and returns a 10-minute URL the client PUTs
/// the bytes to directly.
///
/// The object key is `uploads/<uuid>.<ext>`, so client filenames never reach the bucket
/// path. The original filename is stored as the file's `name`, which is what a course's
/// `thumbnail` field refers to afterwards.
#[utoipa::path(
    post,
    path = "/api/upload/presigned",
    request_body = PresignedUrlRequest,
    responses(
        (status = 200, description = "URL", body = PresignedUrlResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_presigned_url(
    caller: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<PresignedUrlRequest>, JsonRejection>,
) -> Result<Json<PresignedUrlResponse>, ApiError> {
    let Json(payload) = payload?;
    if payload.filename.trim().is_empty() || payload.file_type.trim().is_empty() {
        return Err(ApiError::validation("Filename and file type are required"));
    }

    let extension = Path::new(&payload.filename)
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("bin");
    let resource_key = format!("uploads/{}.{}", Uuid::new_v4(), extension);

    let upload_url = state
        .storage
        .presigned_upload_url(&resource_key, &payload.file_type)
        .await
        .map_err(|e| {
            tracing::error!("Storage error for user {}: {}", caller.id, e);
            ApiError::internal("Failed to generate upload URL")
        })?;

    let file = state
        .repo
        .create_file(NewFile {
            name: payload.filename,
            key: resource_key.clone(),
            mime: payload.file_type,
        })
        .await?;
    tracing::info!("Upload {} registered by user {}", file.id, caller.id);

    Ok(Json(PresignedUrlResponse {
        upload_url,
        resource_key,
        file,
    }))
}
