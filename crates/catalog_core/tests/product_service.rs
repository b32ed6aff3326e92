use catalog_core::db::open_db_in_memory;
use catalog_core::{
    CatalogError, CategoryId, CategoryService, EntityKind, ErrorKind, Product, ProductId,
    ProductRepository, ProductService, RepoError, RepoResult, SqliteCategoryRepository,
    SqliteProductRepository, SqliteTransactionManager, ValidationError,
};
use rusqlite::Connection;
use rust_decimal_macros::dec;

type Categories<'conn> =
    CategoryService<SqliteTransactionManager<'conn, SqliteCategoryRepository<'conn>>>;

fn categories(conn: &Connection) -> Categories<'_> {
    CategoryService::new(SqliteTransactionManager::new(conn, SqliteCategoryRepository::new))
}

fn products<'c, 'conn>(
    conn: &'conn Connection,
    categories: &'c Categories<'conn>,
) -> ProductService<
    'c,
    SqliteTransactionManager<'conn, SqliteProductRepository<'conn>>,
    SqliteTransactionManager<'conn, SqliteCategoryRepository<'conn>>,
> {
    ProductService::new(
        SqliteTransactionManager::new(conn, SqliteProductRepository::new),
        categories,
    )
}

fn product_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_binds_product_to_existing_category() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("Electronics").unwrap();

    let id = products.create("Laptop", dec!(999.99), category_id).unwrap();
    assert_eq!(id, 1);

    let stored = products.find_by_id(id).unwrap();
    assert_eq!(stored.name, "laptop");
    assert_eq!(stored.price, dec!(999.99));
    assert_eq!(stored.category_id, category_id);
}

#[test]
fn product_names_are_unique_across_categories() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let electronics = categories.create_category("electronics").unwrap();
    let office = categories.create_category("office").unwrap();
    products.create("Laptop", dec!(999.99), electronics).unwrap();

    let err = products.create("laptop", dec!(10), office).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::NameConflict {
            entity: EntityKind::Product,
            ..
        }
    ));
    assert_eq!(product_count(&conn), 1);
}

#[test]
fn negative_price_is_rejected_and_nothing_is_written() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("electronics").unwrap();

    let err = products.create("x", dec!(-5), category_id).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidArgument(ValidationError::NegativePrice)
    ));
    assert_eq!(err.to_string(), "price must be positive");
    assert_eq!(product_count(&conn), 0);
}

#[test]
fn zero_price_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("freebies").unwrap();

    let id = products.create("sticker", dec!(0), category_id).unwrap();
    assert!(products.find_by_id(id).unwrap().price.is_zero());
}

#[test]
fn create_reports_missing_or_invalid_category() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);

    let missing = products.create("laptop", dec!(1), 77).unwrap_err();
    assert!(matches!(
        missing,
        CatalogError::NotFound {
            entity: EntityKind::Category,
            id: 77
        }
    ));

    let invalid = products.create("laptop", dec!(1), 0).unwrap_err();
    assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn missing_category_is_reported_before_name_conflict() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("electronics").unwrap();
    let product_id = products.create("laptop", dec!(5), category_id).unwrap();

    let on_create = products.create("LAPTOP", dec!(5), 999).unwrap_err();
    assert_eq!(on_create.kind(), ErrorKind::NotFound);

    products.create("tablet", dec!(5), category_id).unwrap();
    let on_update = products
        .update(product_id, "tablet", dec!(5), 999)
        .unwrap_err();
    assert!(matches!(
        on_update,
        CatalogError::NotFound {
            entity: EntityKind::Category,
            id: 999
        }
    ));
}

#[test]
fn update_replaces_name_price_and_category() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let first = categories.create_category("first").unwrap();
    let second = categories.create_category("second").unwrap();
    let id = products.create("lamp", dec!(20), first).unwrap();

    let updated = products.update(id, " Desk Lamp ", dec!(24.50), second).unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.name, "desk lamp");
    assert_eq!(updated.price, dec!(24.50));
    assert_eq!(updated.category_id, second);
    assert_eq!(products.find_by_id(id).unwrap(), updated);
}

#[test]
fn update_keeping_own_name_is_allowed() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("lighting").unwrap();
    let id = products.create("lamp", dec!(20), category_id).unwrap();

    let updated = products.update(id, "LAMP", dec!(18), category_id).unwrap();
    assert_eq!(updated.price, dec!(18));
}

#[test]
fn update_rejects_name_owned_by_another_product() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("lighting").unwrap();
    products.create("lamp", dec!(20), category_id).unwrap();
    let bulb = products.create("bulb", dec!(2), category_id).unwrap();

    let err = products.update(bulb, "Lamp", dec!(2), category_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameConflict);
    assert_eq!(products.find_by_id(bulb).unwrap().name, "bulb");
}

#[test]
fn update_of_missing_product_reports_its_id() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    categories.create_category("electronics").unwrap();

    let err = products.update(999, "x", dec!(10), 1).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::NotFound {
            entity: EntityKind::Product,
            id: 999
        }
    ));
    assert!(err.to_string().contains("999"));
}

#[test]
fn update_resolves_product_and_category_before_name_and_price() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("electronics").unwrap();
    let id = products.create("laptop", dec!(5), category_id).unwrap();

    for err in [
        products.update(999, "   ", dec!(10), category_id).unwrap_err(),
        products.update(999, "x", dec!(-1), category_id).unwrap_err(),
        products.update(999, "x", dec!(10), 404).unwrap_err(),
    ] {
        assert_eq!(err.to_string(), "product with id: 999 not found");
    }

    let missing_category = products.update(id, "   ", dec!(-1), 404).unwrap_err();
    assert_eq!(missing_category.to_string(), "category with id: 404 not found");

    let blank = products.update(id, "   ", dec!(10), category_id).unwrap_err();
    assert!(matches!(
        blank,
        CatalogError::InvalidArgument(ValidationError::BlankName)
    ));
    let negative = products.update(id, "x", dec!(-1), category_id).unwrap_err();
    assert!(matches!(
        negative,
        CatalogError::InvalidArgument(ValidationError::NegativePrice)
    ));
    assert_eq!(
        products.update(id, "x", dec!(10), 0).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(products.find_by_id(id).unwrap().name, "laptop");
}

#[test]
fn delete_removes_product_and_releases_category() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("electronics").unwrap();
    let id = products.create("laptop", dec!(999.99), category_id).unwrap();

    let in_use = categories.delete(category_id).unwrap_err();
    assert_eq!(in_use.kind(), ErrorKind::Conflict);
    assert_eq!(products.find_by_id(id).unwrap().name, "laptop");
    assert_eq!(categories.find_by_id(category_id).unwrap().name, "electronics");

    products.delete(id).unwrap();
    assert_eq!(products.find_by_id(id).unwrap_err().kind(), ErrorKind::NotFound);
    categories.delete(category_id).unwrap();
}

#[test]
fn delete_of_missing_product_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);

    assert_eq!(products.delete(12).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        products.delete(0).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn find_all_lists_products_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let products = products(&conn, &categories);
    let category_id = categories.create_category("misc").unwrap();
    for name in ["b", "a", "c"] {
        products.create(name, dec!(1), category_id).unwrap();
    }

    let names: Vec<String> = products
        .find_all()
        .unwrap()
        .into_iter()
        .map(|product| product.name)
        .collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

/// Delegates to SQLite but fails right after the update statement ran.
struct FailAfterUpdate<'conn>(SqliteProductRepository<'conn>);

fn fail_after_update(conn: &Connection) -> FailAfterUpdate<'_> {
    FailAfterUpdate(SqliteProductRepository::new(conn))
}

impl ProductRepository for FailAfterUpdate<'_> {
    fn create(&self, product: &Product) -> RepoResult<ProductId> {
        self.0.create(product)
    }

    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        self.0.find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        self.0.find_by_name(name)
    }

    fn update(&self, product: &Product) -> RepoResult<Product> {
        self.0.update(product)?;
        Err(RepoError::InvalidData("simulated failure".to_string()))
    }

    fn delete(&self, product: &Product) -> RepoResult<()> {
        self.0.delete(product)
    }

    fn find_all(&self) -> RepoResult<Vec<Product>> {
        self.0.find_all()
    }
}

#[test]
fn failure_after_write_leaves_persisted_product_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let first: CategoryId = categories.create_category("first").unwrap();
    let second: CategoryId = categories.create_category("second").unwrap();
    let id = products(&conn, &categories)
        .create("lamp", dec!(20), first)
        .unwrap();

    let failing = ProductService::new(
        SqliteTransactionManager::new(&conn, fail_after_update),
        &categories,
    );
    let err = failing.update(id, "torch", dec!(99), second).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);

    let stored = products(&conn, &categories).find_by_id(id).unwrap();
    assert_eq!(stored.name, "lamp");
    assert_eq!(stored.price, dec!(20));
    assert_eq!(stored.category_id, first);
    assert!(conn.is_autocommit());
}

/// Removes the target category right before the insert, as a concurrent
/// writer would between category resolution and the product write.
struct CategoryVanishes<'conn> {
    conn: &'conn Connection,
    inner: SqliteProductRepository<'conn>,
}

fn category_vanishes(conn: &Connection) -> CategoryVanishes<'_> {
    CategoryVanishes {
        conn,
        inner: SqliteProductRepository::new(conn),
    }
}

impl ProductRepository for CategoryVanishes<'_> {
    fn create(&self, product: &Product) -> RepoResult<ProductId> {
        self.conn.execute(
            "DELETE FROM categories WHERE id = ?1;",
            [product.category_id],
        )?;
        self.inner.create(product)
    }

    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        self.inner.find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        self.inner.find_by_name(name)
    }

    fn update(&self, product: &Product) -> RepoResult<Product> {
        self.inner.update(product)
    }

    fn delete(&self, product: &Product) -> RepoResult<()> {
        self.inner.delete(product)
    }

    fn find_all(&self) -> RepoResult<Vec<Product>> {
        self.inner.find_all()
    }
}

#[test]
fn category_removed_before_write_is_reported_as_not_found() {
    let conn = open_db_in_memory().unwrap();
    let categories = categories(&conn);
    let category_id = categories.create_category("seasonal").unwrap();

    let racing = ProductService::new(
        SqliteTransactionManager::new(&conn, category_vanishes),
        &categories,
    );
    let err = racing.create("sled", dec!(40), category_id).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::NotFound {
            entity: EntityKind::Category,
            id
        } if id == category_id
    ));

    assert_eq!(product_count(&conn), 0);
    assert_eq!(categories.find_by_id(category_id).unwrap().name, "seasonal");
    assert!(conn.is_autocommit());
}
