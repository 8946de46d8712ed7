//! Video upload handler.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::video::{
    generate_stored_name, is_video_mime, NewVideo, PendingBlob, VIDEO_FIELD,
};
use crate::web::error::UploadError;
use crate::web::handlers::AppState;

/// Confirmation message for a stored upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Video uploaded successfully!";

/// Upload response body.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Confirmation message.
    pub message: String,
    /// Generated stored name; retrievable at `/uploads/<filename>`.
    pub filename: String,
    /// Location of the stored blob.
    pub path: String,
}

/// A video part that has been fully received but not yet committed.
struct ReceivedVideo {
    stored_name: String,
    blob: PendingBlob,
}

/// POST /api/video - Upload a single video.
///
/// Request body: multipart/form-data with a `video` file part. A request
/// that is not multipart at all carries no file.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let multipart = multipart.map_err(|e| {
        if is_multipart_request(&headers) {
            tracing::warn!("Rejected upload request: {}", e);
            UploadError::MalformedUpload(e.body_text())
        } else {
            tracing::warn!("No file received: request is not multipart");
            UploadError::NoFileUploaded
        }
    })?;

    let received = receive_video(&state, multipart)
        .await?
        .ok_or_else(|| {
            tracing::warn!("No file received");
            UploadError::NoFileUploaded
        })?;

    let stored_name = received.stored_name;
    let path = received.blob.commit().await.map_err(|e| {
        tracing::error!(stored_name = %stored_name, "Failed to store video: {}", e);
        UploadError::Storage
    })?;
    let path = path.to_string_lossy().into_owned();

    let new_video = NewVideo::new(&stored_name, &path);
    state.store.insert(&new_video).await.map_err(|e| {
        tracing::error!(orphaned_path = %path, "Failed to record video: {}", e);
        UploadError::PersistenceFailure
    })?;

    tracing::info!(stored_name = %stored_name, path = %path, "Video uploaded and recorded");

    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        filename: stored_name,
        path,
    }))
}

/// Whether the request declares a `multipart/form-data` body.
fn is_multipart_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

/// Stream the multipart body, enforcing the type and size rules.
///
/// Returns `None` if no video file part was sent. On error the partially
/// written blob is dropped, which removes it from storage.
async fn receive_video(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Option<ReceivedVideo>, UploadError> {
    let mut received: Option<ReceivedVideo> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        UploadError::MalformedUpload(e.body_text())
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            // Plain form fields are read and ignored.
            field.text().await.map_err(|e| {
                tracing::warn!("Failed to read form field {}: {}", field_name, e);
                UploadError::MalformedUpload(e.body_text())
            })?;
            continue;
        };

        if field_name != VIDEO_FIELD || received.is_some() {
            tracing::warn!(field = %field_name, "Unexpected file field");
            return Err(UploadError::MalformedUpload("Unexpected field".to_string()));
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !is_video_mime(&mime) {
            tracing::warn!(mime = %mime, "Rejected file type");
            return Err(UploadError::InvalidFileType);
        }

        let stored_name = generate_stored_name(&original_name);
        tracing::debug!(stored_name = %stored_name, original = %original_name, "Receiving video");

        let mut blob = state.storage.begin(&stored_name).await.map_err(|e| {
            tracing::error!("Failed to open blob for {}: {}", stored_name, e);
            UploadError::Storage
        })?;

        while let Some(chunk) = field.chunk().await.map_err(|e| {
            tracing::warn!("Failed to read file chunk: {}", e);
            UploadError::MalformedUpload(e.body_text())
        })? {
            let seen = blob.written() + chunk.len() as u64;
            if seen > state.max_upload_size {
                tracing::warn!(bytes = seen, limit = state.max_upload_size, "File too large");
                return Err(UploadError::FileTooLarge {
                    limit: state.max_upload_size,
                });
            }
            blob.write(&chunk).await.map_err(|e| {
                tracing::error!("Failed to write {}: {}", stored_name, e);
                UploadError::Storage
            })?;
        }

        received = Some(ReceivedVideo { stored_name, blob });
    }

    Ok(received)
}
