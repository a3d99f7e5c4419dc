use std::sync::Arc;

use models::ids::IdGenerator;
use models::{DeleteProductRequest, NewProduct, Product, UpdateProductRequest};
use tracing::{info, warn};

use crate::blob::BlobStore;
use crate::errors::ServiceError;
use crate::observability::{SNAPSHOT_READS_TOTAL, SNAPSHOT_READ_FALLBACKS_TOTAL, SNAPSHOT_WRITES_TOTAL};

use super::repository::SnapshotRepository;

/// Stateless CRUD over the catalog snapshot.
///
/// Every mutation is read snapshot → change in memory → write the whole
/// snapshot, with no locking or version check: concurrent writers race and
/// the last write wins.
#[derive(Clone)]
pub struct CatalogService {
    repo: SnapshotRepository,
    ids: Arc<dyn IdGenerator>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BlobStore>, key: impl Into<String>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repo: SnapshotRepository::new(store, key), ids }
    }

    /// Current snapshot; a missing, unreadable or corrupt blob is an empty catalog.
    pub async fn read_snapshot(&self) -> Vec<Product> {
        SNAPSHOT_READS_TOTAL.inc();
        match self.repo.load().await {
            Ok(Some(products)) => products,
            Ok(None) => Vec::new(),
            Err(e) => {
                SNAPSHOT_READ_FALLBACKS_TOTAL.inc();
                warn!(key = %self.repo.key(), error = %e, "catalog snapshot unreadable, serving empty catalog");
                Vec::new()
            }
        }
    }

    async fn write_snapshot(&self, products: &[Product]) -> Result<(), ServiceError> {
        self.repo.save(products).await?;
        SNAPSHOT_WRITES_TOTAL.inc();
        Ok(())
    }

    pub async fn list(&self) -> Vec<Product> {
        self.read_snapshot().await
    }

    pub async fn create(&self, input: NewProduct) -> Result<Product, ServiceError> {
        input.validate()?;
        let mut products = self.read_snapshot().await;
        let product = input.into_product(self.ids.next_id());
        products.push(product.clone());
        self.write_snapshot(&products).await?;
        info!(product_id = %product.id, count = products.len(), "product created");
        Ok(product)
    }

    pub async fn update(&self, request: UpdateProductRequest) -> Result<Product, ServiceError> {
        let (id, updates) = request.into_parts()?;
        let mut products = self.read_snapshot().await;
        let existing = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("product", &id))?;
        updates.apply(existing);
        let merged = existing.clone();
        self.write_snapshot(&products).await?;
        info!(product_id = %id, "product updated");
        Ok(merged)
    }

    /// Removes every record with the id and writes the snapshot even when
    /// nothing matched. Returns how many records were removed.
    pub async fn delete(&self, request: DeleteProductRequest) -> Result<usize, ServiceError> {
        let id = request.into_id()?;
        let mut products = self.read_snapshot().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        let removed = before - products.len();
        self.write_snapshot(&products).await?;
        info!(product_id = %id, removed, "product deleted");
        Ok(removed)
    }
}
