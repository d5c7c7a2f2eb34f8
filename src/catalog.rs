//! Translation catalogs and the active-catalog reference.

pub mod active;
pub mod error;
pub mod store;

pub use active::ActiveCatalog;
pub use error::CatalogError;
pub use store::{
    Catalog,
    CatalogStats,
};
