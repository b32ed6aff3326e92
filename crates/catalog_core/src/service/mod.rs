//! Catalog use-case services.
//!
//! # Responsibility
//! - Validate and normalize caller input before storage is touched.
//! - Enforce name uniqueness and category/product referential rules.
//! - Run each use case as one unit of work through `TransactionManager`.
//!
//! # Invariants
//! - Errors are never swallowed; repository failures surface as
//!   `CatalogError::Unexpected` after rollback.
//! - `NotFound`, `NameConflict` and `CategoryInUse` stay distinct so
//!   callers can render distinct messages.

pub mod category_service;
pub mod product_service;

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Entity named by a `NotFound` or `NameConflict` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Product,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Product => write!(f, "product"),
        }
    }
}

/// Fieldless error classification for caller-side branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    NameConflict,
    Conflict,
    Unexpected,
}

/// Service error for catalog use cases.
#[derive(Debug)]
pub enum CatalogError {
    /// Malformed input rejected before or at the start of a use case.
    InvalidArgument(ValidationError),
    /// Referenced entity does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// Another entity of the same kind already holds this normalized name.
    NameConflict { entity: EntityKind, name: String },
    /// Delete refused while products still reference the category.
    CategoryInUse {
        category_id: CategoryId,
        product_count: i64,
    },
    /// Storage failure, propagated unchanged.
    Unexpected(RepoError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NameConflict { .. } => ErrorKind::NameConflict,
            Self::CategoryInUse { .. } => ErrorKind::Conflict,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} with id: {id} not found"),
            Self::NameConflict { entity, name } => {
                write!(f, "{entity} name already exists: `{name}`")
            }
            Self::CategoryInUse {
                category_id,
                product_count,
            } => write!(
                f,
                "category with id: {category_id} is in use by {product_count} product(s)"
            ),
            Self::Unexpected(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument(err) => Some(err),
            Self::Unexpected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidArgument(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Unexpected(value)
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Unexpected(RepoError::Db(value))
    }
}

/// Maps a write rejected by the `UNIQUE` name constraint to `NameConflict`.
///
/// Covers a concurrent writer claiming the name between the service check
/// and the write.
pub(crate) fn map_name_write_error(
    err: RepoError,
    entity: EntityKind,
    name: &str,
) -> CatalogError {
    match err {
        RepoError::Db(ref db) if db.is_unique_violation() => CatalogError::NameConflict {
            entity,
            name: name.to_string(),
        },
        other => CatalogError::Unexpected(other),
    }
}
