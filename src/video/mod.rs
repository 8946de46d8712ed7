//! Video upload domain for reelbox.
//!
//! This module provides:
//! - Stored-name generation for uploaded videos
//! - The flat-directory blob store holding the uploaded bytes
//! - The `videos` metadata table and its store abstraction
//! - Detection of blobs left without a metadata row

mod metadata;
mod naming;
pub mod reconcile;
mod storage;

pub use metadata::{NewVideo, Video, VideoRepository, VideoStore};
pub use naming::{generate_stored_name, sanitize_original_name};
pub use storage::{PendingBlob, VideoStorage};

/// Multipart field that carries the video file.
pub const VIDEO_FIELD: &str = "video";

/// Declared MIME type prefix accepted for uploads.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// Default maximum upload size (15 MiB).
pub const DEFAULT_MAX_VIDEO_SIZE: u64 = 15 * 1024 * 1024;

/// Maximum length of the sanitized original name (in characters).
pub const MAX_ORIGINAL_NAME_LENGTH: usize = 100;

/// Returns true if a declared MIME type is accepted as a video.
pub fn is_video_mime(mime: &str) -> bool {
    mime.starts_with(VIDEO_MIME_PREFIX)
}
