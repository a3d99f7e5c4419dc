//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates can prepare the blob
//! directory from the storage config without depending directly on `common`.

use configs::{BlobBackend, StorageConfig};

/// Ensure the blob root exists when the filesystem backend is configured.
pub async fn ensure_env(static_dir: Option<&str>, storage: &StorageConfig) -> anyhow::Result<()> {
    match storage.backend {
        BlobBackend::Fs => common::env::ensure_env(static_dir, &storage.root_dir).await,
        BlobBackend::Memory => Ok(()),
    }
}
