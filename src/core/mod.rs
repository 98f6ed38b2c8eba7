//! Core module - part numbers, CSV stores and the catalog

pub mod catalog;
pub mod config;
pub mod ipn;
pub mod store;

pub use catalog::{Catalog, CatalogError, ErrorKind, PartSource};
pub use config::Config;
pub use ipn::{Ipn, IpnError};
pub use store::{CsvStore, StoreError};
