use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{check_key, BlobError, BlobObject, BlobStore};

#[derive(Clone, Debug)]
struct StoredBlob {
    body: Vec<u8>,
    content_type: String,
    uploaded_at: DateTime<Utc>,
}

/// Process-local blob store. Used for the `memory` backend and in tests,
/// where the write counter and failure switches make the one-write-per-
/// mutation contract observable.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, StoredBlob>>,
    puts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `put` calls so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub async fn content_type(&self, pathname: &str) -> Option<String> {
        self.objects.read().await.get(pathname).map(|b| b.content_type.clone())
    }

    /// Seed an object without counting it as a write.
    pub async fn insert_raw(&self, pathname: &str, body: impl Into<Vec<u8>>) {
        let blob = StoredBlob { body: body.into(), content_type: "application/octet-stream".into(), uploaded_at: Utc::now() };
        self.objects.write().await.insert(pathname.to_string(), blob);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn describe(pathname: &str, blob: &StoredBlob) -> BlobObject {
        BlobObject {
            pathname: pathname.to_string(),
            url: format!("memory://{}", pathname),
            size: blob.body.len() as u64,
            uploaded_at: blob.uploaded_at,
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BlobError::Io("simulated list failure".into()));
        }
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, blob)| Self::describe(name, blob))
            .collect())
    }

    async fn fetch(&self, pathname: &str) -> Result<Vec<u8>, BlobError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BlobError::Io("simulated fetch failure".into()));
        }
        let objects = self.objects.read().await;
        objects
            .get(pathname)
            .map(|b| b.body.clone())
            .ok_or_else(|| BlobError::NotFound(pathname.to_string()))
    }

    async fn put(&self, pathname: &str, body: Vec<u8>, content_type: &str) -> Result<BlobObject, BlobError> {
        check_key(pathname)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BlobError::Io("simulated write failure".into()));
        }
        let blob = StoredBlob { body, content_type: content_type.to_string(), uploaded_at: Utc::now() };
        let object = Self::describe(pathname, &blob);
        self.objects.write().await.insert(pathname.to_string(), blob);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(object)
    }
}
