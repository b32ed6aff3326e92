//! Command dispatch and error-to-message mapping.

use anyhow::Result;
use catalog_core::{
    CatalogError, CategoryService, EntityKind, ProductService, SqliteCategoryRepository,
    SqliteProductRepository, SqliteTransactionManager,
};
use clap::Subcommand;
use rust_decimal::Decimal;

type CategoryTx<'conn> = SqliteTransactionManager<'conn, SqliteCategoryRepository<'conn>>;
type ProductTx<'conn> = SqliteTransactionManager<'conn, SqliteProductRepository<'conn>>;
pub(crate) type Categories<'conn> = CategoryService<CategoryTx<'conn>>;
pub(crate) type Products<'c, 'conn> = ProductService<'c, ProductTx<'conn>, CategoryTx<'conn>>;

/// Top-level command groups.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CategoryCommand {
    /// Create a category
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// List categories
    List,
    /// Rename a category
    Rename {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete an unused category
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ProductCommand {
    /// Create a product
    Add {
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(allow_negative_numbers = true)]
        price: Decimal,
        #[arg(allow_negative_numbers = true)]
        category_id: i64,
    },
    /// List products
    List,
    /// Replace name, price and category of a product
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(value_name = "NAME")]
        name: String,
        #[arg(allow_negative_numbers = true)]
        price: Decimal,
        #[arg(allow_negative_numbers = true)]
        category_id: i64,
    },
    /// Delete a product
    Delete {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

impl Command {
    /// Short `group_action` label for logs.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Category { action } => match action {
                CategoryCommand::Add { .. } => "category_add",
                CategoryCommand::List => "category_list",
                CategoryCommand::Rename { .. } => "category_rename",
                CategoryCommand::Delete { .. } => "category_delete",
            },
            Self::Product { action } => match action {
                ProductCommand::Add { .. } => "product_add",
                ProductCommand::List => "product_list",
                ProductCommand::Update { .. } => "product_update",
                ProductCommand::Delete { .. } => "product_delete",
            },
        }
    }
}

pub(crate) fn dispatch(
    command: &Command,
    categories: &Categories<'_>,
    products: &Products<'_, '_>,
) -> Result<()> {
    match command {
        Command::Category { action } => run_category(action, categories),
        Command::Product { action } => run_product(action, products),
    }
}

fn run_category(action: &CategoryCommand, categories: &Categories<'_>) -> Result<()> {
    match action {
        CategoryCommand::Add { name } => {
            let id = categories.create_category(name)?;
            let category = categories.find_by_id(id)?;
            println!("added category {id}: {category}");
        }
        CategoryCommand::List => {
            for category in categories.find_all()? {
                println!("{}\t{}", category.id.unwrap_or_default(), category.name);
            }
        }
        CategoryCommand::Rename { id, name } => {
            let category = categories.update(*id, name)?;
            println!(
                "updated category {}: {category}",
                category.id.unwrap_or_default()
            );
        }
        CategoryCommand::Delete { id } => {
            let deleted = categories.delete(*id)?;
            println!("deleted category {}", deleted.name);
        }
    }
    Ok(())
}

fn run_product(action: &ProductCommand, products: &Products<'_, '_>) -> Result<()> {
    match action {
        ProductCommand::Add {
            name,
            price,
            category_id,
        } => {
            let id = products.create(name, *price, *category_id)?;
            let product = products.find_by_id(id)?;
            println!(
                "added product {id}: {} {} (category {})",
                product.name, product.price, product.category_id
            );
        }
        ProductCommand::List => {
            for product in products.find_all()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    product.id.unwrap_or_default(),
                    product.name,
                    product.price,
                    product.category_id
                );
            }
        }
        ProductCommand::Update {
            id,
            name,
            price,
            category_id,
        } => {
            let product = products.update(*id, name, *price, *category_id)?;
            println!(
                "updated product {}: {} {} (category {})",
                product.id.unwrap_or_default(),
                product.name,
                product.price,
                product.category_id
            );
        }
        ProductCommand::Delete { id } => {
            let product = products.find_by_id(*id)?;
            products.delete(*id)?;
            println!("deleted product {}", product.name);
        }
    }
    Ok(())
}

/// Renders a service error the way the catalog UI phrases it.
pub(crate) fn user_message(err: &CatalogError) -> String {
    match err {
        CatalogError::InvalidArgument(inner) => format!("Invalid input: {inner}"),
        CatalogError::NameConflict {
            entity: EntityKind::Category,
            ..
        } => "Category name already exists".to_string(),
        CatalogError::NameConflict {
            entity: EntityKind::Product,
            ..
        } => "Product name already exists".to_string(),
        CatalogError::NotFound { .. } => err.to_string(),
        CatalogError::CategoryInUse { product_count, .. } => {
            format!("Category is in use by {product_count} product(s)")
        }
        CatalogError::Unexpected(inner) => format!("Unexpected storage error: {inner}"),
    }
}
