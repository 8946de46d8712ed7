//! Detection of orphaned videos.
//!
//! A blob is orphaned when it was committed to storage but the metadata
//! insert that should follow it failed. Orphans are reported, never deleted.

use std::collections::HashSet;

use super::{VideoStorage, VideoStore};
use crate::Result;

/// Stored names present in storage with no metadata row.
pub async fn find_orphans(storage: &VideoStorage, store: &dyn VideoStore) -> Result<Vec<String>> {
    let recorded: HashSet<String> = store.list_filenames().await?.into_iter().collect();

    let orphans = storage
        .list()
        .await?
        .into_iter()
        .filter(|name| !recorded.contains(name))
        .collect();

    Ok(orphans)
}

/// Clean up interrupted uploads and log every orphaned video.
///
/// Returns the orphans found.
pub async fn sweep(storage: &VideoStorage, store: &dyn VideoStore) -> Result<Vec<String>> {
    let removed = storage.remove_stale_parts().await?;
    if removed > 0 {
        tracing::info!(removed, "Removed partial uploads");
    }

    let orphans = find_orphans(storage, store).await?;
    for name in &orphans {
        tracing::warn!(
            path = %storage.path_for(name).display(),
            "Orphaned video: stored on disk with no metadata row"
        );
    }

    Ok(orphans)
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::video::{NewVideo, VideoRepository};
    use crate::Database;
    use tempfile::TempDir;

    async fn store_blob(storage: &VideoStorage, name: &str) {
        let mut blob = storage.begin(name).await.unwrap();
        blob.write(b"data").await.unwrap();
        blob.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_find_orphans() {
        let temp_dir = TempDir::new().unwrap();
        let storage = VideoStorage::new(temp_dir.path()).unwrap();
        let db = Database::open_in_memory().await.unwrap();
        let repo = VideoRepository::new(db.pool());

        store_blob(&storage, "1-aa-recorded.mp4").await;
        store_blob(&storage, "2-bb-orphan.mp4").await;
        repo.create(&NewVideo::new("1-aa-recorded.mp4", "uploads/1-aa-recorded.mp4"))
            .await
            .unwrap();

        let orphans = find_orphans(&storage, &repo).await.unwrap();
        assert_eq!(orphans, vec!["2-bb-orphan.mp4"]);
    }

    #[tokio::test]
    async fn test_sweep_removes_parts_but_keeps_orphans() {
        let temp_dir = TempDir::new().unwrap();
        let storage = VideoStorage::new(temp_dir.path()).unwrap();
        let db = Database::open_in_memory().await.unwrap();
        let repo = VideoRepository::new(db.pool());

        store_blob(&storage, "2-bb-orphan.mp4").await;
        tokio::fs::write(temp_dir.path().join(".3-cc-partial.mp4.part"), b"x")
            .await
            .unwrap();

        let orphans = sweep(&storage, &repo).await.unwrap();

        assert_eq!(orphans, vec!["2-bb-orphan.mp4"]);
        assert!(storage.exists("2-bb-orphan.mp4").await);
        assert!(!temp_dir.path().join(".3-cc-partial.mp4.part").exists());
    }
}
