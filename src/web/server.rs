//! Web server for reelbox.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::video::{reconcile, VideoRepository, VideoStorage};
use crate::{Database, ReelboxError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a web server from an application state.
    pub fn new(addr: SocketAddr, app_state: AppState, cors_origins: Vec<String>) -> Self {
        Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins,
        }
    }

    /// Create a web server from configuration and an open database.
    ///
    /// The upload directory is created if it doesn't exist.
    pub fn from_config(config: &Config, db: &Database) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| ReelboxError::Config(format!("invalid server address: {e}")))?;

        let storage = VideoStorage::new(&config.uploads.dir)?;
        tracing::info!("Video storage initialized at: {}", config.uploads.dir);

        let store = Arc::new(VideoRepository::new(db.pool()));
        let app_state = AppState::new(storage, store)
            .with_max_upload_size(config.uploads.max_size_bytes());

        Ok(Self::new(addr, app_state, config.server.cors_origins.clone()))
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> Router {
        create_router(self.app_state.clone(), &self.cors_origins).merge(create_health_router())
    }

    /// Report orphaned videos and clear interrupted uploads before serving.
    async fn startup_sweep(&self) {
        let state = &self.app_state;
        match reconcile::sweep(&state.storage, state.store.as_ref()).await {
            Ok(orphans) if !orphans.is_empty() => {
                tracing::warn!(count = orphans.len(), "Orphaned videos found in storage");
            }
            Ok(_) => tracing::debug!("No orphaned videos found"),
            Err(e) => tracing::warn!(error = %e, "Failed to check storage for orphaned videos"),
        }
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        self.startup_sweep().await;

        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Server running on http://{}", listener.local_addr()?);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        self.startup_sweep().await;

        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Server running on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(upload_dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.uploads.dir = upload_dir.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let upload_dir = temp_dir.path().join("uploads");
        let config = create_test_config(&upload_dir);
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::from_config(&config, &db).unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        assert!(upload_dir.exists());
        assert_eq!(server.app_state.max_upload_size, 15 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_from_config_invalid_host() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(temp_dir.path());
        config.server.host = "not a host".to_string();
        let db = Database::open_in_memory().await.unwrap();

        let result = WebServer::from_config(&config, &db);
        assert!(matches!(result, Err(ReelboxError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_upload_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(temp_dir.path());
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::from_config(&config, &db).unwrap();
        let addr = server.run_with_addr().await.unwrap();
        let client = reqwest::Client::new();

        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");

        let content = vec![0x42u8; 64 * 1024];
        let part = reqwest::multipart::Part::bytes(content.clone())
            .file_name("clip.mp4")
            .mime_str("video/mp4")
            .unwrap();
        let form = reqwest::multipart::Form::new().part("video", part);

        let resp = client
            .post(format!("http://{}/api/video", addr))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        let filename = body["filename"].as_str().unwrap().to_string();

        let resp = client
            .get(format!("http://{}/uploads/{}", addr, filename))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.bytes().await.unwrap().to_vec(), content);
    }
}
