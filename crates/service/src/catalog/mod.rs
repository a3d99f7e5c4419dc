//! Catalog read-modify-write service over a single blob snapshot.

pub mod repository;
pub mod service;

use std::sync::Arc;

use configs::{BlobBackend, IdStrategy, StorageConfig};
use models::ids::{IdGenerator, TimestampIdGenerator, UuidIdGenerator};
use tracing::info;

use crate::blob::{BlobStore, FsBlobStore, MemoryBlobStore};

pub use service::CatalogService;

pub fn id_generator(strategy: IdStrategy) -> Arc<dyn IdGenerator> {
    match strategy {
        IdStrategy::Timestamp => Arc::new(TimestampIdGenerator::new()),
        IdStrategy::Uuid => Arc::new(UuidIdGenerator),
    }
}

pub fn blob_store(cfg: &StorageConfig) -> Arc<dyn BlobStore> {
    match cfg.backend {
        BlobBackend::Fs => Arc::new(FsBlobStore::new(&cfg.root_dir)),
        BlobBackend::Memory => Arc::new(MemoryBlobStore::new()),
    }
}

/// Wire a catalog service from the `[storage]` config section.
pub fn from_config(cfg: &StorageConfig) -> CatalogService {
    info!(backend = ?cfg.backend, root = %cfg.root_dir, key = %cfg.catalog_key, ids = ?cfg.id_strategy, "catalog storage configured");
    CatalogService::new(blob_store(cfg), cfg.catalog_key.clone(), id_generator(cfg.id_strategy))
}
