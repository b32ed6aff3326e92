//! Category domain model.
//!
//! # Invariants
//! - `name` is stored in normalized form (see `normalize_name`).
//! - `id` is `None` until the persistence layer assigns one.

use super::validation::{normalize_name, ValidationError};
use serde::{Deserialize, Serialize};

/// Persistence-assigned category identifier.
pub type CategoryId = i64;

/// Named product grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub name: String,
}

impl Category {
    /// Creates an unsaved category from raw user input.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            name: normalize_name(name)?,
        })
    }

    /// Rebuilds a persisted category.
    ///
    /// Used by repository read paths; the stored name is re-validated so
    /// corrupted rows surface as errors instead of leaking through.
    pub fn with_id(id: CategoryId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Some(id),
            name: normalize_name(name)?,
        })
    }

    /// Returns a copy carrying the new normalized name.
    ///
    /// The receiver is left untouched so a failed write never exposes a
    /// half-updated value.
    pub fn renamed(&self, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            name: normalize_name(name)?,
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
