use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::storage::json_map_store::write_atomic;
use tokio::fs;
use tracing::debug;

use super::{check_key, BlobError, BlobObject, BlobStore};

/// Filesystem-backed blob store: one file per object under `root`.
///
/// Writes go through a temp file + rename so a reader sees either the old
/// object or the new one, never a torn write.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    async fn describe(&self, pathname: &str, path: &Path) -> Result<BlobObject, BlobError> {
        let meta = fs::metadata(path).await.map_err(|e| BlobError::Io(e.to_string()))?;
        let uploaded_at = meta.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
        let abs = fs::canonicalize(path).await.unwrap_or_else(|_| path.to_path_buf());
        Ok(BlobObject {
            pathname: pathname.to_string(),
            url: format!("file://{}", abs.display()),
            size: meta.len(),
            uploaded_at,
        })
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobError> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BlobError::Io(e.to_string())),
        };

        let mut objects = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| BlobError::Io(e.to_string()))? {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(prefix) || name.ends_with(".tmp") {
                continue;
            }
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                objects.push(self.describe(&name, &entry.path()).await?);
            }
        }
        objects.sort_by(|a, b| a.pathname.cmp(&b.pathname));
        Ok(objects)
    }

    async fn fetch(&self, pathname: &str) -> Result<Vec<u8>, BlobError> {
        check_key(pathname)?;
        match fs::read(self.root.join(pathname)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobError::NotFound(pathname.to_string())),
            Err(e) => Err(BlobError::Io(e.to_string())),
        }
    }

    async fn put(&self, pathname: &str, body: Vec<u8>, content_type: &str) -> Result<BlobObject, BlobError> {
        check_key(pathname)?;
        fs::create_dir_all(&self.root).await.map_err(|e| BlobError::Io(e.to_string()))?;
        let path = self.root.join(pathname);
        write_atomic(&path, &body).await.map_err(|e| BlobError::Io(e.to_string()))?;
        debug!(%pathname, %content_type, size = body.len(), "blob written");
        self.describe(pathname, &path).await
    }
}
