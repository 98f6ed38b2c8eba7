//! KiCad HTTP library support
//!
//! - [`projection`] maps the partmaster onto categories, parts and revisions
//! - [`api`] routes library API requests to the projection
//! - [`server`] serves the API over HTTP

pub mod api;
pub mod model;
pub mod projection;
pub mod server;
pub mod tables;

pub use api::{Api, ApiRequest, ApiResponse};
pub use model::{Category, FieldMap, PartDetail, PartField, PartSummary, PartUpdate, SourceUpdate};
pub use projection::CatalogProjection;
pub use server::{LibraryServer, ServeError};
pub use tables::CategoryTables;
