//! Search backend implementations.

pub mod catalog;

pub use catalog::{CatalogEntry, CatalogSearch};
