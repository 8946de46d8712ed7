//! API handlers.

pub mod video;

pub use video::*;

use std::sync::Arc;

use crate::video::{VideoStorage, VideoStore, DEFAULT_MAX_VIDEO_SIZE};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Blob store for uploaded videos.
    pub storage: VideoStorage,
    /// Metadata store for uploaded videos.
    pub store: Arc<dyn VideoStore>,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state with the default size limit.
    pub fn new(storage: VideoStorage, store: Arc<dyn VideoStore>) -> Self {
        Self {
            storage,
            store,
            max_upload_size: DEFAULT_MAX_VIDEO_SIZE,
        }
    }

    /// Set the maximum upload size in bytes.
    pub fn with_max_upload_size(mut self, max_upload_size: u64) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }
}
