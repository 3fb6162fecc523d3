use async_trait::async_trait;

use crate::{
    entities::category::Category,
    errors::AppError,
    repositories::sqlx_repo::SqlxCategoryRepo,
};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError>;
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
}

impl SqlxCategoryRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxCategoryRepo { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepo {
    async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories WHERE name = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
