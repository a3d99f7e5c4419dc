use std::collections::HashMap;
use std::sync::Arc;

use configs::ClientConfig;
use models::ids::{IdGenerator, TimestampIdGenerator};
use models::{NewProduct, Product, ProductUpdates};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{CatalogApi, HttpCatalogApi, RuntimeConfig};
use crate::cache::{FileCache, MemoryCache, ProductCache};
use crate::defaults::default_catalog;
use crate::query;
use crate::sync::{LoadSource, SyncState};

/// Storefront view of the catalog.
///
/// Starts from the bundled catalog, then [`initialize`](Self::initialize)
/// prefers the service, then the local cache. Mutations are optimistic: the
/// local list changes first and is never rolled back when the service call
/// fails; the outcome is recorded as a per-record [`SyncState`] instead.
/// Every change is written through to the cache and published on the
/// [`subscribe`](Self::subscribe) channel.
pub struct CatalogStore {
    api: Arc<dyn CatalogApi>,
    cache: Arc<dyn ProductCache>,
    api_base: String,
    config_url: Option<String>,
    products: Vec<Product>,
    loaded_from_server: bool,
    sync: HashMap<String, SyncState>,
    ids: TimestampIdGenerator,
    tx: watch::Sender<Vec<Product>>,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CatalogApi>, cache: Arc<dyn ProductCache>, api_base: impl Into<String>) -> Self {
        let products = default_catalog();
        let (tx, _) = watch::channel(products.clone());
        Self {
            api,
            cache,
            api_base: api_base.into(),
            config_url: None,
            products,
            loaded_from_server: false,
            sync: HashMap::new(),
            ids: TimestampIdGenerator::new(),
            tx,
        }
    }

    pub fn with_config_url(mut self, url: impl Into<String>) -> Self {
        self.config_url = Some(url.into());
        self
    }

    /// HTTP transport plus a file cache at `cache_path`. Falls back to an
    /// in-memory cache when the file cannot be opened.
    pub async fn from_config(cfg: &ClientConfig) -> Self {
        let cache: Arc<dyn ProductCache> = match FileCache::open(&cfg.cache_path).await {
            Ok(c) => Arc::new(c),
            Err(e) => {
                warn!(path = %cfg.cache_path, error = %e, "cache file unavailable, using memory cache");
                Arc::new(MemoryCache::new())
            }
        };
        let store = Self::new(Arc::new(HttpCatalogApi::new()), cache, cfg.api_base.clone());
        match &cfg.config_url {
            Some(url) => store.with_config_url(url.clone()),
            None => store,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn is_loaded_from_server(&self) -> bool {
        self.loaded_from_server
    }

    /// `None` for records that came from the cache or the bundled catalog and
    /// have not been touched since.
    pub fn sync_state(&self, id: &str) -> Option<SyncState> {
        self.sync.get(id).copied()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.tx.subscribe()
    }

    pub async fn initialize(&mut self) -> LoadSource {
        if let Some(url) = self.config_url.clone() {
            match self.api.fetch_runtime_config(&url).await {
                Ok(RuntimeConfig { api_base: Some(base) }) if !base.is_empty() => {
                    info!(api_base = %base, "api base taken from runtime config");
                    self.api_base = base;
                }
                Ok(_) => {}
                Err(e) => warn!(%url, error = %e, "runtime config unavailable"),
            }
        }

        if self.refresh().await {
            return LoadSource::Server;
        }

        match self.cache.load().await {
            Ok(Some(products)) if !products.is_empty() => {
                info!(count = products.len(), "catalog restored from cache");
                self.products = products;
                self.tx.send_replace(self.products.clone());
                LoadSource::Cache
            }
            Ok(_) => LoadSource::Defaults,
            Err(e) => {
                warn!(error = %e, "cache unreadable, keeping bundled catalog");
                LoadSource::Defaults
            }
        }
    }

    /// Replace local state with the service's catalog. Returns false, leaving
    /// local state alone, when the call fails or the catalog is empty.
    pub async fn refresh(&mut self) -> bool {
        match self.api.list(&self.api_base).await {
            Ok(products) if !products.is_empty() => {
                info!(count = products.len(), "catalog loaded from service");
                self.sync = products.iter().map(|p| (p.id.clone(), SyncState::Synced)).collect();
                self.products = products;
                self.loaded_from_server = true;
                self.commit().await;
                true
            }
            Ok(_) => {
                info!("service returned an empty catalog, keeping local state");
                false
            }
            Err(e) => {
                warn!(api_base = %self.api_base, error = %e, "catalog fetch failed");
                false
            }
        }
    }

    pub async fn add_product(&mut self, input: NewProduct) -> Product {
        let (product, state) = match self.api.create(&self.api_base, &input).await {
            Ok(created) => (created, SyncState::Synced),
            Err(e) => {
                let product = input.into_product(self.ids.next_id());
                warn!(product_id = %product.id, error = %e, "create failed, keeping local-only record");
                (product, SyncState::LocalOnly)
            }
        };
        self.sync.insert(product.id.clone(), state);
        self.products.push(product.clone());
        self.commit().await;
        product
    }

    pub async fn update_product(&mut self, id: &str, updates: ProductUpdates) -> SyncState {
        let known = match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                updates.apply(product);
                true
            }
            None => false,
        };
        if known {
            self.sync.insert(id.to_string(), SyncState::Syncing);
            self.commit().await;
        }

        let state = match self.api.update(&self.api_base, id, &updates).await {
            Ok(_) => SyncState::Synced,
            Err(e) => {
                warn!(product_id = %id, error = %e, "update not synced, keeping local values");
                SyncState::SyncFailed
            }
        };
        if known {
            self.sync.insert(id.to_string(), state);
        }
        state
    }

    pub async fn delete_product(&mut self, id: &str) -> SyncState {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.sync.remove(id);
        if self.products.len() != before {
            self.commit().await;
        }

        match self.api.delete(&self.api_base, id).await {
            Ok(()) => SyncState::Synced,
            Err(e) => {
                warn!(product_id = %id, error = %e, "delete not synced");
                SyncState::SyncFailed
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        query::find_by_id(&self.products, id)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        query::by_category(&self.products, category)
    }

    pub fn search(&self, term: &str) -> Vec<&Product> {
        query::search(&self.products, term)
    }

    pub fn categories(&self) -> Vec<&str> {
        query::categories(&self.products)
    }

    async fn commit(&mut self) {
        if let Err(e) = self.cache.store(&self.products).await {
            warn!(error = %e, "cache write failed");
        }
        self.tx.send_replace(self.products.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Scripted service: an in-memory catalog that can be switched offline.
    #[derive(Default)]
    struct FakeApi {
        online: AtomicBool,
        products: Mutex<Vec<Product>>,
        runtime_base: Option<String>,
        seen_bases: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn online(products: Vec<Product>) -> Self {
            Self { online: AtomicBool::new(true), products: Mutex::new(products), ..Self::default() }
        }

        fn offline() -> Self {
            Self::default()
        }

        fn check(&self, base: &str) -> Result<(), ClientError> {
            self.seen_bases.lock().unwrap().push(base.to_string());
            if self.online.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(ClientError::Status(503, "offline".into()))
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeApi {
        async fn fetch_runtime_config(&self, _url: &str) -> Result<RuntimeConfig, ClientError> {
            Ok(RuntimeConfig { api_base: self.runtime_base.clone() })
        }

        async fn list(&self, base: &str) -> Result<Vec<Product>, ClientError> {
            self.check(base)?;
            Ok(self.products.lock().unwrap().clone())
        }

        async fn create(&self, base: &str, product: &NewProduct) -> Result<Product, ClientError> {
            self.check(base)?;
            let mut all = self.products.lock().unwrap();
            let created = product.clone().into_product(format!("srv-{}", all.len() + 1));
            all.push(created.clone());
            Ok(created)
        }

        async fn update(&self, base: &str, id: &str, updates: &ProductUpdates) -> Result<Product, ClientError> {
            self.check(base)?;
            let mut all = self.products.lock().unwrap();
            let p = all.iter_mut().find(|p| p.id == id).ok_or(ClientError::Status(404, "not found".into()))?;
            updates.apply(p);
            Ok(p.clone())
        }

        async fn delete(&self, base: &str, id: &str) -> Result<(), ClientError> {
            self.check(base)?;
            self.products.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    fn lamp(id: &str) -> Product {
        NewProduct::new("Desk Lamp", 39.0, "lighting").with_description("Warm LED").into_product(id.into())
    }

    fn store_with(api: FakeApi, cache: Arc<MemoryCache>) -> (Arc<FakeApi>, CatalogStore) {
        let api = Arc::new(api);
        let store = CatalogStore::new(api.clone(), cache, "http://catalog.test/api");
        (api, store)
    }

    #[test]
    fn starts_with_bundled_catalog() {
        let (_, store) = store_with(FakeApi::offline(), Arc::new(MemoryCache::new()));
        assert_eq!(store.products(), default_catalog().as_slice());
        assert!(!store.is_loaded_from_server());
        assert_eq!(store.api_base(), "http://catalog.test/api");
    }

    #[tokio::test]
    async fn initialize_prefers_server() {
        let cache = Arc::new(MemoryCache::with_products(vec![lamp("cached")]));
        let (_, mut store) = store_with(FakeApi::online(vec![lamp("srv-1")]), cache.clone());

        assert_eq!(store.initialize().await, LoadSource::Server);
        assert!(store.is_loaded_from_server());
        assert_eq!(store.products(), [lamp("srv-1")].as_slice());
        assert_eq!(store.sync_state("srv-1"), Some(SyncState::Synced));
        assert_eq!(cache.snapshot(), Some(vec![lamp("srv-1")]));
    }

    #[tokio::test]
    async fn initialize_falls_back_to_cache_then_defaults() {
        let cache = Arc::new(MemoryCache::with_products(vec![lamp("cached")]));
        let (_, mut store) = store_with(FakeApi::offline(), cache);
        assert_eq!(store.initialize().await, LoadSource::Cache);
        assert_eq!(store.products(), [lamp("cached")].as_slice());
        assert_eq!(store.sync_state("cached"), None);

        let (_, mut store) = store_with(FakeApi::offline(), Arc::new(MemoryCache::new()));
        assert_eq!(store.initialize().await, LoadSource::Defaults);
        assert_eq!(store.products(), default_catalog().as_slice());
    }

    #[tokio::test]
    async fn empty_server_catalog_does_not_replace_local_state() {
        let (_, mut store) = store_with(FakeApi::online(vec![]), Arc::new(MemoryCache::new()));
        assert_eq!(store.initialize().await, LoadSource::Defaults);
        assert!(!store.is_loaded_from_server());
        assert!(!store.refresh().await);
        assert_eq!(store.products(), default_catalog().as_slice());
    }

    #[tokio::test]
    async fn runtime_config_overrides_api_base() {
        let api = FakeApi { runtime_base: Some("https://edge.example/api".into()), ..FakeApi::online(vec![lamp("1")]) };
        let (api, store) = store_with(api, Arc::new(MemoryCache::new()));
        let mut store = store.with_config_url("https://shop.example/config.json");

        store.initialize().await;
        assert_eq!(store.api_base(), "https://edge.example/api");
        assert_eq!(api.seen_bases.lock().unwrap().as_slice(), ["https://edge.example/api"]);
    }

    #[tokio::test]
    async fn empty_runtime_api_base_is_ignored() {
        let api = FakeApi { runtime_base: Some(String::new()), ..FakeApi::online(vec![lamp("1")]) };
        let (_, store) = store_with(api, Arc::new(MemoryCache::new()));
        let mut store = store.with_config_url("https://shop.example/config.json");
        store.initialize().await;
        assert_eq!(store.api_base(), "http://catalog.test/api");
    }

    #[tokio::test]
    async fn add_online_appends_server_record() {
        let (api, mut store) = store_with(FakeApi::online(vec![lamp("1")]), Arc::new(MemoryCache::new()));
        store.initialize().await;

        let added = store.add_product(NewProduct::new("Tea", 4.5, "pantry")).await;
        assert_eq!(added.id, "srv-2");
        assert_eq!(store.sync_state("srv-2"), Some(SyncState::Synced));
        assert_eq!(store.products().last(), Some(&added));
        assert_eq!(api.products.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn add_offline_appends_local_only_record() {
        let cache = Arc::new(MemoryCache::new());
        let (_, mut store) = store_with(FakeApi::offline(), cache.clone());
        let before = store.products().len();

        let added = store.add_product(NewProduct::new("Tea", 4.5, "pantry").with_stock(3)).await;
        assert!(!added.id.is_empty());
        assert!(added.id.parse::<i64>().is_ok(), "time-based id, got {}", added.id);
        assert_eq!(store.products().len(), before + 1);
        assert_eq!(store.find_by_id(&added.id), Some(&added));
        assert_eq!(store.sync_state(&added.id), Some(SyncState::LocalOnly));
        assert!(cache.snapshot().unwrap().contains(&added));
    }

    #[tokio::test]
    async fn update_offline_keeps_local_change() {
        let (api, mut store) = store_with(FakeApi::online(vec![lamp("1")]), Arc::new(MemoryCache::new()));
        store.initialize().await;
        api.online.store(false, Ordering::SeqCst);

        let updates = ProductUpdates { price: Some(29.0), ..ProductUpdates::default() };
        assert_eq!(store.update_product("1", updates).await, SyncState::SyncFailed);
        assert_eq!(store.sync_state("1"), Some(SyncState::SyncFailed));

        let local = store.find_by_id("1").unwrap();
        assert_eq!(local.price, 29.0);
        assert_eq!(local.name, "Desk Lamp");
        assert_eq!(api.products.lock().unwrap()[0].price, 39.0);
    }

    #[tokio::test]
    async fn update_online_is_synced() {
        let (api, mut store) = store_with(FakeApi::online(vec![lamp("1")]), Arc::new(MemoryCache::new()));
        store.initialize().await;
        let mut rx = store.subscribe();

        let updates = ProductUpdates { offer_price: Some(Some(31.0)), ..ProductUpdates::default() };
        assert_eq!(store.update_product("1", updates).await, SyncState::Synced);
        assert_eq!(store.sync_state("1"), Some(SyncState::Synced));
        assert_eq!(api.products.lock().unwrap()[0].offer_price, Some(31.0));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update()[0].offer_price, Some(31.0));
    }

    #[tokio::test]
    async fn delete_offline_still_removes_locally() {
        let (api, mut store) = store_with(FakeApi::online(vec![lamp("1"), lamp("2")]), Arc::new(MemoryCache::new()));
        store.initialize().await;
        api.online.store(false, Ordering::SeqCst);

        assert_eq!(store.delete_product("1").await, SyncState::SyncFailed);
        assert!(store.find_by_id("1").is_none());
        assert_eq!(store.sync_state("1"), None);
        assert_eq!(store.products().len(), 1);
        assert_eq!(api.products.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn refresh_reconciles_to_server() {
        let (api, mut store) = store_with(FakeApi::offline(), Arc::new(MemoryCache::new()));
        let local = store.add_product(NewProduct::new("Tea", 4.5, "pantry")).await;
        assert_eq!(store.sync_state(&local.id), Some(SyncState::LocalOnly));

        api.online.store(true, Ordering::SeqCst);
        api.products.lock().unwrap().push(lamp("srv-9"));
        assert!(store.refresh().await);
        assert_eq!(store.products(), [lamp("srv-9")].as_slice());
        assert_eq!(store.sync_state(&local.id), None);
    }

    #[tokio::test]
    async fn queries_run_over_current_products() {
        let (_, mut store) = store_with(FakeApi::online(vec![lamp("1")]), Arc::new(MemoryCache::new()));
        store.initialize().await;
        store.add_product(NewProduct::new("Tea Towel", 9.0, "kitchen").with_description("Waffle weave")).await;

        assert_eq!(store.categories(), ["lighting", "kitchen"]);
        assert_eq!(store.by_category("kitchen").len(), 1);
        let hits = store.search("waffle");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Tea Towel");
    }
}
