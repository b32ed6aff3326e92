//! Category use-case service.
//!
//! # Responsibility
//! - Create, read, rename and delete categories.
//! - Keep category names unique after normalization.
//! - Refuse deletes while products still reference the category.
//!
//! # Invariants
//! - Ids are validated before a transaction is opened; on update the target
//!   must exist before the new name is checked.
//! - Uniqueness checks and the write they guard share one transaction.
//! - Renaming a category to the name it already holds is not a conflict.

use super::{map_name_write_error, CatalogError, CatalogResult, EntityKind};
use crate::model::category::{Category, CategoryId};
use crate::model::validation::{normalize_name, validate_id};
use crate::repo::category_repo::CategoryRepository;
use crate::tx::TransactionManager;
use log::{info, warn};

/// Category service facade over a transaction manager.
pub struct CategoryService<M> {
    tx: M,
}

impl<M> CategoryService<M>
where
    M: TransactionManager,
    M::Repo: CategoryRepository,
{
    /// Creates a service that runs every use case through `tx`.
    pub fn new(tx: M) -> Self {
        Self { tx }
    }

    /// Creates one category and returns its id.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank name.
    /// - `NameConflict` when the normalized name is taken.
    pub fn create_category(&self, name: &str) -> CatalogResult<CategoryId> {
        let category = Category::new(name)?;

        let result = self.tx.do_in_transaction(|repo| -> CatalogResult<CategoryId> {
            ensure_name_available(repo, &category.name, None)?;
            repo.create(&category)
                .map_err(|err| map_name_write_error(err, EntityKind::Category, &category.name))
        });

        match &result {
            Ok(id) => info!("event=category_create module=service status=ok category_id={id}"),
            Err(err) => warn!(
                "event=category_create module=service status=error kind={:?}",
                err.kind()
            ),
        }
        result
    }

    /// Gets one category by id.
    pub fn find_by_id(&self, id: CategoryId) -> CatalogResult<Category> {
        validate_id("id", id)?;
        self.tx
            .do_in_transaction(|repo| -> CatalogResult<Category> { find_required(repo, id) })
    }

    /// Looks a category up by name, applying the same normalization as
    /// writes. Returns `None` when no category holds the name.
    pub fn find_by_name(&self, name: &str) -> CatalogResult<Option<Category>> {
        let normalized = normalize_name(name)?;
        self.tx
            .do_in_transaction(|repo| -> CatalogResult<Option<Category>> {
                Ok(repo.find_by_name(&normalized)?)
            })
    }

    /// Lists every category in storage order.
    pub fn find_all(&self) -> CatalogResult<Vec<Category>> {
        self.tx
            .do_in_transaction(|repo| -> CatalogResult<Vec<Category>> { Ok(repo.find_all()?) })
    }

    /// Renames one category and returns the stored result.
    ///
    /// # Errors
    /// - `InvalidArgument` for a non-positive id.
    /// - `NotFound` when no category has `id`, even if `name` is blank.
    /// - `InvalidArgument` for a blank name on an existing category.
    /// - `NameConflict` when a different category holds the new name.
    pub fn update(&self, id: CategoryId, name: &str) -> CatalogResult<Category> {
        validate_id("id", id)?;

        let result = self.tx.do_in_transaction(|repo| -> CatalogResult<Category> {
            let existing = find_required(repo, id)?;
            let normalized = normalize_name(name)?;
            ensure_name_available(repo, &normalized, Some(id))?;
            let renamed = existing.renamed(&normalized)?;
            repo.update(&renamed)
                .map_err(|err| map_name_write_error(err, EntityKind::Category, &normalized))
        });

        match &result {
            Ok(_) => info!("event=category_update module=service status=ok category_id={id}"),
            Err(err) => warn!(
                "event=category_update module=service status=error category_id={id} kind={:?}",
                err.kind()
            ),
        }
        result
    }

    /// Deletes one unused category and returns it as confirmation.
    ///
    /// # Errors
    /// - `NotFound` when no category has `id`.
    /// - `CategoryInUse` while any product references it; nothing is deleted.
    pub fn delete(&self, id: CategoryId) -> CatalogResult<Category> {
        validate_id("id", id)?;

        let result = self.tx.do_in_transaction(|repo| -> CatalogResult<Category> {
            let existing = find_required(repo, id)?;
            let product_count = repo.count_products_using_category(id)?;
            if product_count > 0 {
                return Err(CatalogError::CategoryInUse {
                    category_id: id,
                    product_count,
                });
            }
            repo.delete(&existing)?;
            Ok(existing)
        });

        match &result {
            Ok(_) => info!("event=category_delete module=service status=ok category_id={id}"),
            Err(err) => warn!(
                "event=category_delete module=service status=error category_id={id} kind={:?}",
                err.kind()
            ),
        }
        result
    }
}

fn find_required<R: CategoryRepository>(repo: &R, id: CategoryId) -> CatalogResult<Category> {
    repo.find_by_id(id)?
        .ok_or_else(|| CatalogError::not_found(EntityKind::Category, id))
}

fn ensure_name_available<R: CategoryRepository>(
    repo: &R,
    name: &str,
    owner: Option<CategoryId>,
) -> CatalogResult<()> {
    match repo.find_by_name(name)? {
        Some(found) if owner.is_none() || found.id != owner => Err(CatalogError::NameConflict {
            entity: EntityKind::Category,
            name: name.to_string(),
        }),
        _ => Ok(()),
    }
}
