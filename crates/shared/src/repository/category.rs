use crate::{
    abstract_trait::CategoryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{CreateCategoryRequest, UpdateCategoryRequest},
    errors::RepositoryError,
    model::Category,
};
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

pub struct CategoryRepository {
    db: ConnectionPool,
}

impl CategoryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let category = sqlx::query_as::<_, Category>(
            "SELECT category_id, slug, name, description, created_at, updated_at \
             FROM categories WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(category)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let category = sqlx::query_as::<_, Category>(
            "SELECT category_id, slug, name, description, created_at, updated_at \
             FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(category)
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, slug, name, description, created_at, updated_at \
             FROM categories ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to list categories: {:?}", err);
            RepositoryError::from(err)
        })?;

        Ok(categories)
    }

    async fn create(&self, req: &CreateCategoryRequest) -> Result<Category, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (category_id, slug, name, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, current_timestamp, current_timestamp) \
             RETURNING category_id, slug, name, description, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&req.slug)
        .bind(&req.name)
        .bind(&req.description)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create category {}: {:?}", req.slug, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created category {} ({})", category.category_id, category.slug);
        Ok(category)
    }

    async fn update(
        &self,
        category_id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Category, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories \
             SET name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 updated_at = current_timestamp \
             WHERE category_id = $1 \
             RETURNING category_id, slug, name, description, created_at, updated_at",
        )
        .bind(category_id)
        .bind(&req.name)
        .bind(&req.description)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated category {}", category.category_id);
        Ok(category)
    }
}
