//! Storage helpers shared across crates
//!
//! Small file-backed stores for state where a database is overkill.

pub mod json_map_store;
