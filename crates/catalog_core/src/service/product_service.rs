//! Product use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete products.
//! - Keep product names globally unique after normalization.
//! - Bind every product to an existing category.
//!
//! # Invariants
//! - Category resolution runs in its own read transaction before the
//!   product transaction opens; an invalid category is therefore reported
//!   before any product name conflict.
//! - Product writes are atomic; the `products.category_id` foreign key
//!   rejects a category that disappeared in between, reported as the
//!   category's `NotFound`.
//! - On update, product and category existence are resolved before the
//!   new name and price are checked.
//! - Updating a product while keeping its own name is not a conflict.

use super::category_service::CategoryService;
use super::{map_name_write_error, CatalogError, CatalogResult, EntityKind};
use crate::repo::RepoError;
use crate::model::category::CategoryId;
use crate::model::product::{Product, ProductId};
use crate::model::validation::{normalize_name, validate_id, validate_price};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::tx::TransactionManager;
use log::{info, warn};
use rust_decimal::Decimal;

/// Product service facade.
///
/// Borrows the category service for category existence checks; products
/// never hold a category object.
pub struct ProductService<'c, P, C> {
    tx: P,
    categories: &'c CategoryService<C>,
}

impl<'c, P, C> ProductService<'c, P, C>
where
    P: TransactionManager,
    P::Repo: ProductRepository,
    C: TransactionManager,
    C::Repo: CategoryRepository,
{
    pub fn new(tx: P, categories: &'c CategoryService<C>) -> Self {
        Self { tx, categories }
    }

    /// Creates one product and returns its id.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank name, negative price or
    ///   non-positive category id.
    /// - `NotFound` when the category does not exist.
    /// - `NameConflict` when any product already holds the name.
    pub fn create(
        &self,
        name: &str,
        price: Decimal,
        category_id: CategoryId,
    ) -> CatalogResult<ProductId> {
        let product = Product::new(name, price, category_id)?;
        self.categories.find_by_id(category_id)?;

        let result = self.tx.do_in_transaction(|repo| -> CatalogResult<ProductId> {
            ensure_name_available(repo, &product.name, None)?;
            repo.create(&product)
                .map_err(|err| map_write_error(err, &product.name, category_id))
        });

        match &result {
            Ok(id) => info!(
                "event=product_create module=service status=ok product_id={id} category_id={category_id}"
            ),
            Err(err) => warn!(
                "event=product_create module=service status=error kind={:?}",
                err.kind()
            ),
        }
        result
    }

    /// Gets one product by id.
    pub fn find_by_id(&self, id: ProductId) -> CatalogResult<Product> {
        validate_id("id", id)?;
        self.tx
            .do_in_transaction(|repo| -> CatalogResult<Product> { find_required(repo, id) })
    }

    /// Lists every product in storage order.
    pub fn find_all(&self) -> CatalogResult<Vec<Product>> {
        self.tx
            .do_in_transaction(|repo| -> CatalogResult<Vec<Product>> { Ok(repo.find_all()?) })
    }

    /// Replaces name, price and category of one product.
    ///
    /// # Errors
    /// - `InvalidArgument` for a non-positive product or category id.
    /// - `NotFound` for a missing product, then for a missing category,
    ///   before name and price are looked at.
    /// - `InvalidArgument` for a blank name or negative price.
    /// - `NameConflict` when a different product holds the new name.
    pub fn update(
        &self,
        id: ProductId,
        name: &str,
        price: Decimal,
        category_id: CategoryId,
    ) -> CatalogResult<Product> {
        validate_id("id", id)?;
        validate_id("category id", category_id)?;

        self.find_by_id(id)?;
        self.categories.find_by_id(category_id)?;
        let normalized = normalize_name(name)?;
        validate_price(price)?;

        let result = self.tx.do_in_transaction(|repo| -> CatalogResult<Product> {
            let existing = find_required(repo, id)?;
            ensure_name_available(repo, &normalized, Some(id))?;
            let replacement = existing.replaced(&normalized, price, category_id)?;
            repo.update(&replacement)
                .map_err(|err| map_write_error(err, &normalized, category_id))
        });

        match &result {
            Ok(_) => info!("event=product_update module=service status=ok product_id={id}"),
            Err(err) => warn!(
                "event=product_update module=service status=error product_id={id} kind={:?}",
                err.kind()
            ),
        }
        result
    }

    /// Deletes one product.
    pub fn delete(&self, id: ProductId) -> CatalogResult<()> {
        validate_id("id", id)?;

        let result = self.tx.do_in_transaction(|repo| -> CatalogResult<()> {
            let existing = find_required(repo, id)?;
            Ok(repo.delete(&existing)?)
        });

        match &result {
            Ok(()) => info!("event=product_delete module=service status=ok product_id={id}"),
            Err(err) => warn!(
                "event=product_delete module=service status=error product_id={id} kind={:?}",
                err.kind()
            ),
        }
        result
    }
}

fn find_required<R: ProductRepository>(repo: &R, id: ProductId) -> CatalogResult<Product> {
    repo.find_by_id(id)?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Product, id))
}

fn map_write_error(err: RepoError, name: &str, category_id: CategoryId) -> CatalogError {
    match err {
        RepoError::Db(ref db) if db.is_foreign_key_violation() => {
            CatalogError::not_found(EntityKind::Category, category_id)
        }
        other => map_name_write_error(other, EntityKind::Product, name),
    }
}

fn ensure_name_available<R: ProductRepository>(
    repo: &R,
    name: &str,
    owner: Option<ProductId>,
) -> CatalogResult<()> {
    match repo.find_by_name(name)? {
        Some(found) if owner.is_none() || found.id != owner => Err(CatalogError::NameConflict {
            entity: EntityKind::Product,
            name: name.to_string(),
        }),
        _ => Ok(()),
    }
}
