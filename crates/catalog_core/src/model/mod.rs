//! Catalog domain model.
//!
//! # Responsibility
//! - Define the category/product records shared by repositories and services.
//! - Own the input validation and name normalization rules.
//!
//! # Invariants
//! - Stored names are trimmed, non-empty and lower-cased.
//! - Prices are never negative.
//! - Products reference categories by id only; categories never hold
//!   a collection of products.

pub mod category;
pub mod product;
pub mod validation;
