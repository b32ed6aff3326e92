//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the category/product data access contracts used by services.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories persist entities as given; name normalization and
//!   uniqueness policy belong to the service layer.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod category_repo;
pub mod product_repo;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by category and product persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No row with this id exists in the entity's table.
    NotFound(i64),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn require_id(id: Option<i64>, table: &str) -> RepoResult<i64> {
    id.ok_or_else(|| RepoError::InvalidData(format!("{table} row has no id; create it first")))
}
