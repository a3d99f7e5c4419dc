//! Service layer for the product catalog.
//! - `blob`: the object-store seam the catalog snapshot lives in.
//! - `catalog`: the read-modify-write cycle over that snapshot.
//! - `observability`: Prometheus counters for snapshot traffic and requests.

pub mod errors;
pub mod runtime;
pub mod blob;
pub mod catalog;
pub mod observability;
