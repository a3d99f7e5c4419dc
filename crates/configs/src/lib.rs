use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Which blob store implementation backs the catalog.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    #[default]
    Fs,
    Memory,
}

/// How the service assigns ids to newly created products.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Timestamp,
    Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BlobBackend,
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default = "default_catalog_key")]
    pub catalog_key: String,
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::default(),
            root_dir: default_root_dir(),
            catalog_key: default_catalog_key(),
            id_strategy: IdStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Optional runtime document (`{"apiBase": ...}`) fetched once at startup.
    #[serde(default)]
    pub config_url: Option<String>,
    #[serde(default = "default_cache_path")]
    pub cache_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_base: default_api_base(), config_url: None, cache_path: default_cache_path() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_root_dir() -> String { "data/blob".into() }
fn default_catalog_key() -> String { "products.json".into() }
fn default_api_base() -> String { "http://127.0.0.1:8080/api".into() }
fn default_cache_path() -> String { "data/storefront_cache.json".into() }

/// Load from `CONFIG_PATH` (default `config.toml`); see [`load_or_default`].
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_or_default(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Load `path`, or defaults when the file does not exist. Parse errors and
/// other I/O failures are returned.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match load_from_file(path) {
        Ok(cfg) => Ok(cfg),
        Err(e) if e.downcast_ref::<std::io::Error>().is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound) => {
            Ok(AppConfig::default())
        }
        Err(e) => Err(e.context(format!("failed to load config from {path}"))),
    }
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults only when
    /// the file is missing, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env_overrides_with(|k| std::env::var(k).ok());
        self.server.normalize()?;
        self.storage.validate()?;
        self.client.validate()?;
        Ok(())
    }

    /// Apply environment overrides using the supplied lookup.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(dir) = lookup("BLOB_STORE_DIR") {
            self.storage.root_dir = dir;
        }
        if let Some(key) = lookup("CATALOG_BLOB_KEY") {
            self.storage.catalog_key = key;
        }
        if let Some(base) = lookup("CATALOG_API_BASE") {
            self.client.api_base = base;
        }
        if let Some(url) = lookup("CATALOG_CONFIG_URL") {
            self.client.config_url = Some(url);
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.catalog_key.trim().is_empty() {
            return Err(anyhow!("storage.catalog_key must not be empty"));
        }
        if self.catalog_key.contains('/') || self.catalog_key.contains('\\') {
            return Err(anyhow!("storage.catalog_key must be a plain object name"));
        }
        if self.backend == BlobBackend::Fs && self.root_dir.trim().is_empty() {
            return Err(anyhow!("storage.root_dir is required for the fs backend"));
        }
        Ok(())
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        let lower = self.api_base.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("client.api_base must start with http:// or https://"));
        }
        Ok(())
    }
}
