//! reelbox - video upload service
//!
//! Accepts a single video per HTTP upload, stores it in a flat directory and
//! records it in the `videos` table.

pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod video;
pub mod web;

pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{ReelboxError, Result};
pub use video::{NewVideo, Video, VideoRepository, VideoStorage, VideoStore};
pub use web::{create_router, AppState, UploadError, WebServer};
