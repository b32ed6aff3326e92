//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and name lookup over the `products` table.
//!
//! # Invariants
//! - Prices round-trip through decimal TEXT keeping their scale.
//! - `find_all` is ordered by `id ASC`.
//! - The `category_id` foreign key is enforced by SQLite, not re-checked here.

use super::{require_id, RepoError, RepoResult};
use crate::model::product::{Product, ProductId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const PRODUCT_SELECT_SQL: &str = "SELECT id, name, price, category_id FROM products";

/// Repository interface for product persistence.
pub trait ProductRepository {
    /// Inserts an unsaved product and returns its assigned id.
    fn create(&self, product: &Product) -> RepoResult<ProductId>;
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>>;
    /// Persists name, price and category and returns the stored row.
    fn update(&self, product: &Product) -> RepoResult<Product>;
    fn delete(&self, product: &Product) -> RepoResult<()>;
    fn find_all(&self) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create(&self, product: &Product) -> RepoResult<ProductId> {
        self.conn.execute(
            "INSERT INTO products (name, price, category_id) VALUES (?1, ?2, ?3);",
            params![
                product.name.as_str(),
                product.price.to_string(),
                product.category_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let product = match rows.next()? {
            Some(row) => Some(parse_product_row(row)?),
            None => None,
        };
        Ok(product)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let id: Option<ProductId> = self
            .conn
            .query_row("SELECT id FROM products WHERE name = ?1;", [name], |row| {
                row.get(0)
            })
            .optional()?;
        match id {
            Some(id) => self.find_by_id(id),
            None => Ok(None),
        }
    }

    fn update(&self, product: &Product) -> RepoResult<Product> {
        let id = require_id(product.id, "products")?;
        let changed = self.conn.execute(
            "UPDATE products
             SET name = ?2,
                 price = ?3,
                 category_id = ?4
             WHERE id = ?1;",
            params![
                id,
                product.name.as_str(),
                product.price.to_string(),
                product.category_id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete(&self, product: &Product) -> RepoResult<()> {
        let id = require_id(product.id, "products")?;
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }
        Ok(products)
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;
    let name: String = row.get("name")?;
    let price_text: String = row.get("price")?;
    let category_id: i64 = row.get("category_id")?;

    let price = Decimal::from_str(&price_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid decimal `{price_text}` in products.price for id {id}"
        ))
    })?;

    Product::with_id(id, &name, price, category_id)
        .map_err(|err| RepoError::InvalidData(format!("products row {id}: {err}")))
}
