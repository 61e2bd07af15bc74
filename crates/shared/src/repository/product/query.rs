use crate::{
    abstract_trait::ProductQueryRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Product, ProductImage, ProductVariant},
};
use async_trait::async_trait;
use tracing::error;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "product_id, category_id, sku, slug, name, short_description, \
     long_description, base_price, currency, is_active, is_featured, stock_quantity, is_deleted, \
     status, publish_at, created_at, updated_at";

pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_by_id(&self, product_id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch product {}: {:?}", product_id, err);
                RepositoryError::from(err)
            })?;

        Ok(product)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch product by slug {}: {:?}", slug, err);
                RepositoryError::from(err)
            })?;

        Ok(product)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(product)
    }

    async fn find_all_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_deleted = false AND is_active = true \
             ORDER BY created_at DESC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to list products: {:?}", err);
                RepositoryError::from(err)
            })?;

        Ok(products)
    }

    async fn find_images(&self, product_id: Uuid) -> Result<Vec<ProductImage>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let images = sqlx::query_as::<_, ProductImage>(
            "SELECT image_id, product_id, url, alt_text, sort_order, created_at \
             FROM product_images WHERE product_id = $1 ORDER BY sort_order, created_at",
        )
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(images)
    }

    async fn find_variants(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let variants = sqlx::query_as::<_, ProductVariant>(
            "SELECT variant_id, product_id, name, price_delta, stock_quantity, created_at \
             FROM product_variants WHERE product_id = $1 ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(variants)
    }

    async fn find_variant(
        &self,
        variant_id: Uuid,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let variant = sqlx::query_as::<_, ProductVariant>(
            "SELECT variant_id, product_id, name, price_delta, stock_quantity, created_at \
             FROM product_variants WHERE variant_id = $1",
        )
        .bind(variant_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch variant {}: {:?}", variant_id, err);
            RepositoryError::from(err)
        })?;

        Ok(variant)
    }
}
