use crate::data::constraint_of;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::product::{Product, ProductDraft};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, only_available: bool) -> Result<Vec<Product>, DomainError>;
    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError>;
    async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError>;
    /// Replaces every field. A `None` image URL keeps the stored one.
    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Option<Product>, DomainError>;
    async fn toggle_availability(&self, id: i64) -> Result<Option<Product>, DomainError>;
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    available: bool,
    is_monthly_special: bool,
    category_id: i64,
    category_name: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            available: row.available,
            monthly_special: row.is_monthly_special,
        }
    }
}

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.price, p.image_url, p.available, p.is_monthly_special,
    c.id AS category_id, c.name AS category_name
"#;

#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_error(e: sqlx::Error, category_id: i64) -> DomainError {
    if constraint_of(&e) == Some("products_category_id_fkey") {
        DomainError::CategoryNotFound(category_id)
    } else {
        error!("failed to save product: {}", e);
        DomainError::Internal(format!("database error: {}", e))
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(&self, only_available: bool) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p JOIN categories c ON c.id = p.category_id
             WHERE ($1 = FALSE OR p.available) ORDER BY p.id"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(only_available)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while listing products: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_by_category(&self, category_id: i64) -> Result<Vec<Product>, DomainError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p JOIN categories c ON c.id = p.category_id
             WHERE p.category_id = $1 ORDER BY p.id"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while listing category {}: {}", category_id, e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find product {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(row.map(Product::from))
    }

    async fn create(&self, draft: ProductDraft) -> Result<Product, DomainError> {
        let sql = format!(
            r#"
            WITH p AS (
                INSERT INTO products
                    (name, description, price, image_url, category_id, available, is_monthly_special)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS} FROM p JOIN categories c ON c.id = p.category_id
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.price)
            .bind(&draft.image_url)
            .bind(draft.category_id)
            .bind(draft.available)
            .bind(draft.monthly_special)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, draft.category_id))?;

        info!(product_id = row.id, name = %row.name, "product created");
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: ProductDraft) -> Result<Option<Product>, DomainError> {
        let sql = format!(
            r#"
            WITH p AS (
                UPDATE products
                SET name = $1,
                    description = $2,
                    price = $3,
                    image_url = COALESCE($4, image_url),
                    category_id = $5,
                    available = $6,
                    is_monthly_special = $7
                WHERE id = $8
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS} FROM p JOIN categories c ON c.id = p.category_id
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.price)
            .bind(&draft.image_url)
            .bind(draft.category_id)
            .bind(draft.available)
            .bind(draft.monthly_special)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, draft.category_id))?;

        if row.is_some() {
            info!(product_id = id, "product updated");
        }
        Ok(row.map(Product::from))
    }

    async fn toggle_availability(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let sql = format!(
            r#"
            WITH p AS (
                UPDATE products SET available = NOT available WHERE id = $1 RETURNING *
            )
            SELECT {PRODUCT_COLUMNS} FROM p JOIN categories c ON c.id = p.category_id
            "#
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to toggle product {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if let Some(row) = &row {
            info!(product_id = id, available = row.available, "availability toggled");
        }
        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(product_id = id, "product deleted");
        }
        Ok(removed)
    }
}
