//! Product domain model.
//!
//! # Invariants
//! - `name` is stored in normalized form, same rule as categories.
//! - `price >= 0`.
//! - `category_id` always points at a persisted category.

use super::category::CategoryId;
use super::validation::{normalize_name, validate_id, validate_price, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persistence-assigned product identifier.
pub type ProductId = i64;

/// Priced catalog item bound to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    /// Arbitrary-precision amount; serializes as a decimal string.
    pub price: Decimal,
    pub category_id: CategoryId,
}

impl Product {
    /// Creates an unsaved product from raw user input.
    pub fn new(name: &str, price: Decimal, category_id: CategoryId) -> Result<Self, ValidationError> {
        Ok(Self {
            id: None,
            name: normalize_name(name)?,
            price: validate_price(price)?,
            category_id: validate_id("category id", category_id)?,
        })
    }

    /// Rebuilds a persisted product.
    pub fn with_id(
        id: ProductId,
        name: &str,
        price: Decimal,
        category_id: CategoryId,
    ) -> Result<Self, ValidationError> {
        let mut product = Self::new(name, price, category_id)?;
        product.id = Some(id);
        Ok(product)
    }

    /// Returns a copy with every mutable field replaced.
    ///
    /// The identity is preserved; the receiver is not modified.
    pub fn replaced(
        &self,
        name: &str,
        price: Decimal,
        category_id: CategoryId,
    ) -> Result<Self, ValidationError> {
        let mut product = Self::new(name, price, category_id)?;
        product.id = self.id;
        Ok(product)
    }
}
