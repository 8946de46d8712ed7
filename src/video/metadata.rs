//! Video metadata types and repository.

use async_trait::async_trait;

use crate::db::{DbPool, SQL_NOW};
use crate::{ReelboxError, Result};

/// A stored video record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Video {
    /// Row ID.
    pub id: i64,
    /// Generated stored name.
    pub filename: String,
    /// Location of the blob (`<upload dir>/<filename>`).
    pub path: String,
    /// Insert time assigned by the database (UTC, `YYYY-MM-DD HH:MM:SS`).
    pub uploaded_at: String,
}

/// Data for recording a newly stored video.
#[derive(Debug, Clone)]
pub struct NewVideo {
    /// Generated stored name.
    pub filename: String,
    /// Location of the blob.
    pub path: String,
}

impl NewVideo {
    /// Create a new NewVideo.
    pub fn new(filename: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }
}

/// Metadata store for uploaded videos.
///
/// The upload handler only depends on this trait, so the backing store can
/// be swapped (e.g. for a failing double in tests).
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert one row; the store assigns `uploaded_at`.
    async fn insert(&self, video: &NewVideo) -> Result<Video>;

    /// All recorded stored names.
    async fn list_filenames(&self) -> Result<Vec<String>>;
}

/// sqlx-backed repository for the `videos` table.
#[derive(Debug, Clone)]
pub struct VideoRepository {
    pool: DbPool,
}

impl VideoRepository {
    /// Create a new repository instance.
    pub fn new(pool: &DbPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Insert a video row.
    pub async fn create(&self, video: &NewVideo) -> Result<Video> {
        let sql = format!(
            "INSERT INTO videos (filename, path, uploaded_at) VALUES ($1, $2, {}) RETURNING id",
            SQL_NOW
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(&video.filename)
            .bind(&video.path)
            .fetch_one(&self.pool)
            .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ReelboxError::NotFound("Video".into()))
    }

    /// Get a video by row ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            "SELECT id, filename, path, uploaded_at FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Get a video by stored name.
    pub async fn get_by_filename(&self, filename: &str) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            "SELECT id, filename, path, uploaded_at FROM videos WHERE filename = $1",
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// List all videos, newest first.
    pub async fn list(&self) -> Result<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT id, filename, path, uploaded_at FROM videos
             ORDER BY uploaded_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    /// Count all videos.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl VideoStore for VideoRepository {
    async fn insert(&self, video: &NewVideo) -> Result<Video> {
        self.create(video).await
    }

    async fn list_filenames(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT filename FROM videos ORDER BY filename")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::datetime::parse_db_datetime;
    use crate::Database;
    use chrono::{Duration, Utc};

    async fn setup_repo() -> (Database, VideoRepository) {
        let db = Database::open_in_memory().await.unwrap();
        let repo = VideoRepository::new(db.pool());
        (db, repo)
    }

    #[tokio::test]
    async fn test_create_video() {
        let (_db, repo) = setup_repo().await;
        let start = Utc::now() - Duration::seconds(1);

        let video = repo
            .create(&NewVideo::new("1-aa-clip.mp4", "uploads/1-aa-clip.mp4"))
            .await
            .unwrap();

        assert_eq!(video.filename, "1-aa-clip.mp4");
        assert_eq!(video.path, "uploads/1-aa-clip.mp4");
        let uploaded_at = parse_db_datetime(&video.uploaded_at).unwrap();
        assert!(uploaded_at >= start);
    }

    #[tokio::test]
    async fn test_duplicate_filename_rejected() {
        let (_db, repo) = setup_repo().await;
        let new_video = NewVideo::new("1-aa-clip.mp4", "uploads/1-aa-clip.mp4");

        repo.create(&new_video).await.unwrap();
        let result = repo.create(&new_video).await;

        assert!(matches!(result, Err(ReelboxError::Database(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_filename() {
        let (_db, repo) = setup_repo().await;
        repo.create(&NewVideo::new("1-aa-clip.mp4", "uploads/1-aa-clip.mp4"))
            .await
            .unwrap();

        let found = repo.get_by_filename("1-aa-clip.mp4").await.unwrap();
        assert_eq!(found.unwrap().path, "uploads/1-aa-clip.mp4");

        assert!(repo.get_by_filename("missing.mp4").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_db, repo) = setup_repo().await;
        repo.create(&NewVideo::new("1-aa-a.mp4", "uploads/1-aa-a.mp4"))
            .await
            .unwrap();
        repo.create(&NewVideo::new("2-bb-b.mp4", "uploads/2-bb-b.mp4"))
            .await
            .unwrap();

        let videos = repo.list().await.unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].filename, "2-bb-b.mp4");
        assert_eq!(videos[1].filename, "1-aa-a.mp4");
    }

    #[tokio::test]
    async fn test_store_trait() {
        let (_db, repo) = setup_repo().await;
        let store: &dyn VideoStore = &repo;

        store
            .insert(&NewVideo::new("2-bb-b.mp4", "uploads/2-bb-b.mp4"))
            .await
            .unwrap();
        store
            .insert(&NewVideo::new("1-aa-a.mp4", "uploads/1-aa-a.mp4"))
            .await
            .unwrap();

        assert_eq!(
            store.list_filenames().await.unwrap(),
            vec!["1-aa-a.mp4", "2-bb-b.mp4"]
        );
    }
}
