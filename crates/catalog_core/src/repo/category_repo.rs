//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and name lookup over the `categories` table.
//! - Answer "is this category in use" with a count query over `products`.
//!
//! # Invariants
//! - `find_by_name` matches the stored (normalized) name exactly.
//! - `find_all` is ordered by `id ASC`.

use super::{require_id, RepoError, RepoResult};
use crate::model::category::{Category, CategoryId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name FROM categories";

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Inserts an unsaved category and returns its assigned id.
    fn create(&self, category: &Category) -> RepoResult<CategoryId>;
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Persists the category's current name and returns the stored row.
    fn update(&self, category: &Category) -> RepoResult<Category>;
    fn delete(&self, category: &Category) -> RepoResult<()>;
    fn find_all(&self) -> RepoResult<Vec<Category>>;
    /// Counts products whose `category_id` references this category.
    fn count_products_using_category(&self, id: CategoryId) -> RepoResult<i64>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create(&self, category: &Category) -> RepoResult<CategoryId> {
        self.conn.execute(
            "INSERT INTO categories (name) VALUES (?1);",
            [category.name.as_str()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.find_one(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"), id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        self.find_one(&format!("{CATEGORY_SELECT_SQL} WHERE name = ?1;"), name)
    }

    fn update(&self, category: &Category) -> RepoResult<Category> {
        let id = require_id(category.id, "categories")?;
        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?2
             WHERE id = ?1;",
            params![id, category.name.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.find_by_id(id)?.ok_or(RepoError::NotFound(id))
    }

    fn delete(&self, category: &Category) -> RepoResult<()> {
        let id = require_id(category.id, "categories")?;
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn count_products_using_category(&self, id: CategoryId) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM products WHERE category_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SqliteCategoryRepository<'_> {
    fn find_one(&self, sql: &str, key: impl rusqlite::ToSql) -> RepoResult<Option<Category>> {
        let row = self
            .conn
            .query_row(sql, [key], |row| {
                Ok((row.get::<_, i64>("id")?, row.get::<_, String>("name")?))
            })
            .optional()?;

        row.map(|(id, name)| build_category(id, &name)).transpose()
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id: i64 = row.get("id")?;
    let name: String = row.get("name")?;
    build_category(id, &name)
}

fn build_category(id: i64, name: &str) -> RepoResult<Category> {
    let category = Category::with_id(id, name).map_err(|err| {
        RepoError::InvalidData(format!("categories.name for id {id}: {err}"))
    })?;
    if category.name != name {
        return Err(RepoError::InvalidData(format!(
            "categories.name for id {id} is not normalized"
        )));
    }
    Ok(category)
}
