//! Blob storage for uploaded videos.
//!
//! Videos live in a single flat directory:
//! ```text
//! {base_path}/
//! ├── 1718000000000-3fa2b1c9-clip.mp4
//! ├── 1718000004211-90be77d0-holiday.mov
//! └── .1718000009000-11aa22bb-big.mp4.part   (upload in progress)
//! ```
//! Bytes are streamed into a hidden `.part` file and renamed into place only
//! once the upload has been fully accepted, so readers never observe a
//! partial video under its stored name.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::{ReelboxError, Result};

const PART_SUFFIX: &str = ".part";

/// Flat-directory blob store for uploaded videos.
#[derive(Debug, Clone)]
pub struct VideoStorage {
    /// Directory holding the stored videos.
    base_path: PathBuf,
}

impl VideoStorage {
    /// Create a new VideoStorage rooted at `base_path`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the final path for a stored name.
    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }

    fn part_path_for(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(format!(".{stored_name}{PART_SUFFIX}"))
    }

    /// Start writing a new blob under `stored_name`.
    ///
    /// Nothing is visible under the stored name until [`PendingBlob::commit`].
    pub async fn begin(&self, stored_name: &str) -> Result<PendingBlob> {
        let temp_path = self.part_path_for(stored_name);
        let file = File::create(&temp_path).await?;

        Ok(PendingBlob {
            file: Some(file),
            temp_path,
            final_path: self.path_for(stored_name),
            written: 0,
            finished: false,
        })
    }

    /// Check if a committed blob exists.
    pub async fn exists(&self, stored_name: &str) -> bool {
        fs::try_exists(self.path_for(stored_name))
            .await
            .unwrap_or(false)
    }

    /// Load a committed blob.
    pub async fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.path_for(stored_name)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ReelboxError::NotFound(format!("Video: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List the stored names of all committed blobs, sorted.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !is_part_name(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Remove `.part` files left behind by interrupted uploads.
    ///
    /// Only meant to run when no upload is in flight (e.g. at startup).
    pub async fn remove_stale_parts(&self) -> Result<usize> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.base_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let is_part = entry.file_name().to_str().is_some_and(is_part_name);
            if is_part && fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        Ok(removed)
    }
}

fn is_part_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PART_SUFFIX)
}

/// A blob being written.
///
/// Dropping a `PendingBlob` without calling [`commit`](Self::commit) removes
/// the partial file.
#[derive(Debug)]
pub struct PendingBlob {
    file: Option<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
    finished: bool,
}

impl PendingBlob {
    /// Append a chunk of bytes.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| ReelboxError::Validation("blob already finished".to_string()))?;
        file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush the bytes and move the blob under its stored name.
    ///
    /// Fails without overwriting if a blob with the same name already exists.
    pub async fn commit(mut self) -> Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }

        if fs::try_exists(&self.final_path).await? {
            return Err(ReelboxError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", self.final_path.display()),
            )));
        }

        fs::rename(&self.temp_path, &self.final_path).await?;
        self.finished = true;
        Ok(self.final_path.clone())
    }

    /// Remove the partial file.
    pub async fn discard(mut self) -> Result<()> {
        self.file.take();
        self.finished = true;
        match fs::remove_file(&self.temp_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for PendingBlob {
    fn drop(&mut self) {
        if !self.finished {
            self.file.take();
            // Blocking on purpose: an async removal spawned from drop may never run.
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}
