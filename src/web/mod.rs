//! Web API module for reelbox.
//!
//! Exposes the upload endpoint, static retrieval of stored videos and a
//! health check.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::UploadError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
