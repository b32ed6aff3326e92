//! Core domain logic for the product catalog.
//! This crate is the single source of truth for catalog business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tx;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::product::{Product, ProductId};
pub use model::validation::{normalize_name, ValidationError};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::product_service::ProductService;
pub use service::{CatalogError, CatalogResult, EntityKind, ErrorKind};
pub use tx::{SqliteTransactionManager, TransactionManager};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
