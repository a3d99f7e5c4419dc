use models::Product;
use tracing::warn;

const DEFAULT_CATALOG: &str = include_str!("../data/default_catalog.json");

/// Catalog bundled with the client, shown before anything has been loaded.
pub fn default_catalog() -> Vec<Product> {
    serde_json::from_str(DEFAULT_CATALOG).unwrap_or_else(|e| {
        warn!(error = %e, "bundled catalog does not parse, starting empty");
        Vec::new()
    })
}
