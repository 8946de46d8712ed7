//! Upload error handling for the Web API.
//!
//! Every failure is reported as JSON with a single `error` key; the HTTP
//! status is the only machine-readable classification.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// Failures of the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Declared MIME type is not `video/*`.
    InvalidFileType,
    /// The file part exceeded the size limit (in bytes) while streaming.
    FileTooLarge {
        /// Enforced limit in bytes.
        limit: u64,
    },
    /// Any other multipart failure (bad boundary, unexpected field, truncated body).
    MalformedUpload(String),
    /// Well-formed request without a video file part.
    NoFileUploaded,
    /// The blob could not be written to storage.
    Storage,
    /// The metadata insert failed after the blob was stored.
    PersistenceFailure,
}

impl UploadError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::InvalidFileType
            | UploadError::MalformedUpload(_)
            | UploadError::NoFileUploaded => StatusCode::BAD_REQUEST,
            UploadError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Storage | UploadError::PersistenceFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> String {
        match self {
            UploadError::InvalidFileType => "Only video files are allowed".to_string(),
            UploadError::FileTooLarge { limit } => {
                format!("File exceeds {}MB limit", limit / (1024 * 1024))
            }
            UploadError::MalformedUpload(msg) => msg.clone(),
            UploadError::NoFileUploaded => "No file uploaded".to_string(),
            UploadError::Storage => "Failed to save file".to_string(),
            UploadError::PersistenceFailure => "Database error".to_string(),
        }
    }

    /// Returns true for errors caused by the client's request.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status_code(), self.message())
    }
}

impl std::error::Error for UploadError {}
