use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::storage::json_map_store::JsonMapStore;
use models::Product;

use crate::errors::ClientError;

/// Name of the single cache entry holding the product list.
pub const CACHE_ENTRY: &str = "products";

/// Local persistence for the last known catalog.
#[async_trait]
pub trait ProductCache: Send + Sync {
    /// `Ok(None)` when nothing has been cached yet.
    async fn load(&self) -> Result<Option<Vec<Product>>, ClientError>;
    async fn store(&self, products: &[Product]) -> Result<(), ClientError>;
}

/// JSON file cache backed by a [`JsonMapStore`] with one `products` entry.
#[derive(Clone)]
pub struct FileCache {
    store: Arc<JsonMapStore<String, Vec<Product>>>,
}

impl FileCache {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ClientError> {
        let store = JsonMapStore::new(path).await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl ProductCache for FileCache {
    async fn load(&self) -> Result<Option<Vec<Product>>, ClientError> {
        Ok(self.store.get(&CACHE_ENTRY.to_string()).await)
    }

    async fn store(&self, products: &[Product]) -> Result<(), ClientError> {
        self.store.insert(CACHE_ENTRY.to_string(), products.to_vec()).await?;
        Ok(())
    }
}

/// In-process cache; used when no cache file can be opened.
#[derive(Default)]
pub struct MemoryCache {
    products: Mutex<Option<Vec<Product>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products: Mutex::new(Some(products)) }
    }

    pub fn snapshot(&self) -> Option<Vec<Product>> {
        self.products.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl ProductCache for MemoryCache {
    async fn load(&self) -> Result<Option<Vec<Product>>, ClientError> {
        Ok(self.snapshot())
    }

    async fn store(&self, products: &[Product]) -> Result<(), ClientError> {
        *self.products.lock().unwrap_or_else(|p| p.into_inner()) = Some(products.to_vec());
        Ok(())
    }
}
