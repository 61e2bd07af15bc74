use crate::{
    domain::requests::{BulkProductUpdateItem, CreateProductImageRequest, CreateProductRequest},
    errors::RepositoryError,
    model::{Product, ProductImage, ProductVariant},
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<Product>, RepositoryError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError>;
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError>;
    async fn find_all_active(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn find_images(&self, product_id: Uuid) -> Result<Vec<ProductImage>, RepositoryError>;
    async fn find_variants(&self, product_id: Uuid)
    -> Result<Vec<ProductVariant>, RepositoryError>;
    async fn find_variant(
        &self,
        variant_id: Uuid,
    ) -> Result<Option<ProductVariant>, RepositoryError>;
}

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    /// Inserts the product plus its inline images and variants in one
    /// transaction.
    async fn create_product(
        &self,
        req: &CreateProductRequest,
        sku: &str,
    ) -> Result<Product, RepositoryError>;
    /// Writes the full row; the service merges partial updates beforehand.
    async fn update_product(&self, product: &Product) -> Result<Product, RepositoryError>;
    async fn soft_delete_product(&self, product_id: Uuid) -> Result<(), RepositoryError>;
    async fn bulk_update(
        &self,
        updates: &[(Uuid, BulkProductUpdateItem)],
    ) -> Result<Vec<Product>, RepositoryError>;
    async fn add_image(
        &self,
        product_id: Uuid,
        req: &CreateProductImageRequest,
    ) -> Result<ProductImage, RepositoryError>;
    /// Deletes the image row and returns it so the caller can remove the
    /// stored file.
    async fn delete_image(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<ProductImage, RepositoryError>;
}
