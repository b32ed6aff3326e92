//! Input validation and normalization helpers.
//!
//! # Responsibility
//! - Normalize user-supplied names into their canonical stored form.
//! - Reject malformed ids and prices before any storage access.
//!
//! # Invariants
//! - `normalize_name` is idempotent.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for catalog entity input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming.
    BlankName,
    /// Identifier is zero or negative.
    NonPositiveId { field: &'static str, value: i64 },
    /// Price is below zero.
    NegativePrice,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must be provided"),
            Self::NonPositiveId { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::NegativePrice => write!(f, "price must be positive"),
        }
    }
}

impl Error for ValidationError {}

/// Trims and lower-cases a name.
///
/// # Errors
/// - `ValidationError::BlankName` when nothing remains after trimming.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankName);
    }
    Ok(trimmed.to_lowercase())
}

/// Rejects zero and negative identifiers.
pub fn validate_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveId { field, value });
    }
    Ok(value)
}

/// Rejects negative prices. Zero is a valid price.
pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice);
    }
    Ok(price)
}
