use async_trait::async_trait;
use models::{DeleteProductRequest, NewProduct, Product, ProductUpdates, UpdateProductRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ClientError;

/// Optional runtime document that can point the storefront at another API base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default, rename = "apiBase")]
    pub api_base: Option<String>,
}

/// Transport to the catalog service. Every call takes the API base explicitly
/// since it can change once the runtime config has been read.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_runtime_config(&self, url: &str) -> Result<RuntimeConfig, ClientError>;
    async fn list(&self, base: &str) -> Result<Vec<Product>, ClientError>;
    async fn create(&self, base: &str, product: &NewProduct) -> Result<Product, ClientError>;
    async fn update(&self, base: &str, id: &str, updates: &ProductUpdates) -> Result<Product, ClientError>;
    async fn delete(&self, base: &str, id: &str) -> Result<(), ClientError>;
}

#[derive(Clone, Default)]
pub struct HttpCatalogApi {
    http: reqwest::Client,
}

impl HttpCatalogApi {
    pub fn new() -> Self {
        Self::default()
    }
}

fn products_url(base: &str) -> String {
    format!("{}/products", base.trim_end_matches('/'))
}

async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ClientError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ClientError::Status(status.as_u16(), body));
    }
    res.json::<T>().await.map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_runtime_config(&self, url: &str) -> Result<RuntimeConfig, ClientError> {
        let res = self.http.get(url).send().await?;
        decode(res).await
    }

    async fn list(&self, base: &str) -> Result<Vec<Product>, ClientError> {
        let url = products_url(base);
        debug!(%url, "fetching catalog");
        let res = self.http.get(&url).send().await?;
        decode(res).await
    }

    async fn create(&self, base: &str, product: &NewProduct) -> Result<Product, ClientError> {
        let res = self.http.post(products_url(base)).json(product).send().await?;
        decode(res).await
    }

    async fn update(&self, base: &str, id: &str, updates: &ProductUpdates) -> Result<Product, ClientError> {
        let body = UpdateProductRequest::new(id, updates.clone());
        let res = self.http.put(products_url(base)).json(&body).send().await?;
        decode(res).await
    }

    async fn delete(&self, base: &str, id: &str) -> Result<(), ClientError> {
        let res = self.http.delete(products_url(base)).json(&DeleteProductRequest::new(id)).send().await?;
        let _ack: serde_json::Value = decode(res).await?;
        Ok(())
    }
}
