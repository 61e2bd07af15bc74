use tracing::info;

use crate::{
    abstract_trait::DynCategoryRepository,
    domain::{
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
        responses::{ApiResponse, CategoryResponse},
    },
    errors::{RepositoryError, ServiceError},
};

#[derive(Clone)]
pub struct CategoryService {
    repository: DynCategoryRepository,
}

impl CategoryService {
    pub fn new(repository: DynCategoryRepository) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> Result<ApiResponse<Vec<CategoryResponse>>, ServiceError> {
        let categories = self.repository.find_all().await?;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Categories retrieved".to_string(),
            data: categories.into_iter().map(CategoryResponse::from).collect(),
        })
    }

    pub async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        let category = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Category retrieved".to_string(),
            data: CategoryResponse::from(category),
        })
    }

    pub async fn create(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        if self.repository.find_by_slug(&req.slug).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(format!(
                "Category with slug '{}' already exists",
                req.slug
            ))
            .into());
        }

        let category = self.repository.create(req).await?;

        info!("✅ Created category {} ({})", category.name, category.slug);

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Category created".to_string(),
            data: CategoryResponse::from(category),
        })
    }

    pub async fn update(
        &self,
        slug: &str,
        req: &UpdateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        let category = self
            .repository
            .find_by_slug(slug)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let category = self.repository.update(category.category_id, req).await?;

        info!("🔄 Updated category {}", category.slug);

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Category updated".to_string(),
            data: CategoryResponse::from(category),
        })
    }
}
