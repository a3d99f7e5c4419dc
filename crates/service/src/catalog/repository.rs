use std::sync::Arc;

use models::Product;

use crate::blob::BlobStore;
use crate::errors::ServiceError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Reads and writes the catalog snapshot: one JSON array at a fixed key.
///
/// This layer reports failures as they are; deciding that a failed read
/// means "empty catalog" is the caller's policy.
#[derive(Clone)]
pub struct SnapshotRepository {
    store: Arc<dyn BlobStore>,
    key: String,
}

impl SnapshotRepository {
    pub fn new(store: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `Ok(None)` when no object exists at the key.
    pub async fn load(&self) -> Result<Option<Vec<Product>>, ServiceError> {
        let objects = self.store.list(&self.key).await?;
        let Some(object) = objects.into_iter().find(|o| o.pathname == self.key) else {
            return Ok(None);
        };
        let bytes = self.store.fetch(&object.pathname).await?;
        let products = serde_json::from_slice::<Vec<Product>>(&bytes)
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(Some(products))
    }

    /// Replace the stored snapshot with `products`.
    pub async fn save(&self, products: &[Product]) -> Result<(), ServiceError> {
        let body = serde_json::to_vec_pretty(products).map_err(|e| ServiceError::Decode(e.to_string()))?;
        self.store.put(&self.key, body, JSON_CONTENT_TYPE).await?;
        Ok(())
    }
}
