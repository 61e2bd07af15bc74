use crate::{
    domain::requests::{CreateCategoryRequest, UpdateCategoryRequest},
    errors::RepositoryError,
    model::Category,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub type DynCategoryRepository = Arc<dyn CategoryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CategoryRepositoryTrait {
    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<Category>, RepositoryError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;
    async fn create(&self, req: &CreateCategoryRequest) -> Result<Category, RepositoryError>;
    async fn update(
        &self,
        category_id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Category, RepositoryError>;
}
