//! Catalog data model and mutation engine.
//!
//! `Catalog` holds one version's ordered categories and entries; the
//! primitives in `mutate` derive the next version from a forked copy.
//! `CatalogRepository` holds published versions once they are sealed.

pub mod identity;
pub mod model;
pub mod mutate;
pub mod repository;
pub mod store;

pub use identity::{CategoryId, EntryId, Label, VersionKey};
pub use model::{CATALOG_SCHEMA_VERSION, Category, CatalogDocument, Entry, Icon};
pub use repository::CatalogRepository;
pub use store::Catalog;
