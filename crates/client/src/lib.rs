//! Storefront-side catalog state, kept in sync with the catalog service on a
//! best-effort basis.

pub mod errors;
pub mod api;
pub mod cache;
pub mod defaults;
pub mod query;
pub mod store;
pub mod sync;

pub use api::{CatalogApi, HttpCatalogApi, RuntimeConfig};
pub use cache::{FileCache, MemoryCache, ProductCache};
pub use errors::ClientError;
pub use store::CatalogStore;
pub use sync::{LoadSource, SyncState};
