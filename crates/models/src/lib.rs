//! Catalog data model shared by the service and the storefront client.

pub mod errors;
pub mod coerce;
pub mod ids;
pub mod product;

pub use product::{DeleteProductRequest, NewProduct, Product, ProductUpdates, UpdateProductRequest};
