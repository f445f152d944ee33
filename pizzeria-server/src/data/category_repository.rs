use crate::data::constraint_of;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Category, DomainError>;
    async fn list(&self) -> Result<Vec<Category>, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError>;
    /// Removes the category together with its products. Returns `false` when
    /// no such category exists.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn create(&self, name: &str) -> Result<Category, DomainError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if constraint_of(&e) == Some("categories_name_key") {
                DomainError::CategoryAlreadyExists(name.to_string())
            } else {
                error!("failed to create category: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            }
        })?;

        info!(category_id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while listing categories: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find category {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        // products go with it through ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete category {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(category_id = id, "category deleted");
        }
        Ok(removed)
    }
}
