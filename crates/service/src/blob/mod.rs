//! Blob store abstraction.
//!
//! The catalog lives in a single object at a fixed key. Objects are always
//! replaced whole; there are no partial updates and no conditional writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

/// Metadata describing a stored object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobObject {
    pub pathname: String,
    pub url: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("invalid blob key: {0}")]
    InvalidKey(String),
    #[error("blob io error: {0}")]
    Io(String),
}

/// Trait abstraction for object storage.
/// Implementations can be filesystem-backed, in-memory, or a remote service.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// List objects whose pathname starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobError>;
    /// Fetch the full body of the object at `pathname`.
    async fn fetch(&self, pathname: &str) -> Result<Vec<u8>, BlobError>;
    /// Replace (or create) the object at `pathname` with `body`.
    async fn put(&self, pathname: &str, body: Vec<u8>, content_type: &str) -> Result<BlobObject, BlobError>;
}

/// Keys are flat object names: no separators, no parent references.
pub(crate) fn check_key(pathname: &str) -> Result<(), BlobError> {
    if pathname.is_empty() || pathname.contains('/') || pathname.contains('\\') || pathname == ".." || pathname == "." {
        return Err(BlobError::InvalidKey(pathname.to_string()));
    }
    Ok(())
}
