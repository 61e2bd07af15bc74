use crate::{
    abstract_trait::ProductCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{BulkProductUpdateItem, CreateProductImageRequest, CreateProductRequest},
    errors::RepositoryError,
    model::{Product, ProductImage},
};
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

const PRODUCT_RETURNING: &str = "product_id, category_id, sku, slug, name, short_description, \
     long_description, base_price, currency, is_active, is_featured, stock_quantity, is_deleted, \
     status, publish_at, created_at, updated_at";

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
        sku: &str,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let publish_at = match req.status {
            crate::model::ProductStatus::Published => Some(chrono::Utc::now()),
            _ => None,
        };

        let sql = format!(
            "INSERT INTO products (product_id, category_id, sku, slug, name, short_description, \
             long_description, base_price, currency, is_active, is_featured, stock_quantity, \
             is_deleted, status, publish_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, false, $13, $14, \
             current_timestamp, current_timestamp) \
             RETURNING {PRODUCT_RETURNING}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(req.category_id)
            .bind(sku)
            .bind(&req.slug)
            .bind(&req.name)
            .bind(&req.short_description)
            .bind(&req.long_description)
            .bind(req.base_price)
            .bind(&req.currency)
            .bind(req.is_active)
            .bind(req.is_featured)
            .bind(req.stock_quantity)
            .bind(req.status)
            .bind(publish_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to create product {}: {:?}", req.slug, err);
                RepositoryError::from(err)
            })?;

        for image in &req.images {
            sqlx::query(
                "INSERT INTO product_images (image_id, product_id, url, alt_text, sort_order, created_at) \
                 VALUES ($1, $2, $3, $4, $5, current_timestamp)",
            )
            .bind(Uuid::new_v4())
            .bind(product.product_id)
            .bind(&image.url)
            .bind(&image.alt_text)
            .bind(image.sort_order)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        for variant in &req.variants {
            sqlx::query(
                "INSERT INTO product_variants (variant_id, product_id, name, price_delta, stock_quantity, created_at) \
                 VALUES ($1, $2, $3, $4, $5, current_timestamp)",
            )
            .bind(Uuid::new_v4())
            .bind(product.product_id)
            .bind(&variant.name)
            .bind(variant.price_delta)
            .bind(variant.stock_quantity)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("✅ Created product {} ({})", product.product_id, product.slug);
        Ok(product)
    }

    async fn update_product(&self, product: &Product) -> Result<Product, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "UPDATE products \
             SET category_id = $2, sku = $3, slug = $4, name = $5, short_description = $6, \
                 long_description = $7, base_price = $8, currency = $9, is_active = $10, \
                 is_featured = $11, stock_quantity = $12, status = $13, publish_at = $14, \
                 updated_at = current_timestamp \
             WHERE product_id = $1 \
             RETURNING {PRODUCT_RETURNING}"
        );
        let result = sqlx::query_as::<_, Product>(&sql)
            .bind(product.product_id)
            .bind(product.category_id)
            .bind(&product.sku)
            .bind(&product.slug)
            .bind(&product.name)
            .bind(&product.short_description)
            .bind(&product.long_description)
            .bind(product.base_price)
            .bind(&product.currency)
            .bind(product.is_active)
            .bind(product.is_featured)
            .bind(product.stock_quantity)
            .bind(product.status)
            .bind(product.publish_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update product {}: {:?}", product.product_id, err);
                RepositoryError::from(err)
            })?;

        info!("🔄 Updated product {}", result.product_id);
        Ok(result)
    }

    async fn soft_delete_product(&self, product_id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            "UPDATE products SET is_deleted = true, updated_at = current_timestamp \
             WHERE product_id = $1 AND is_deleted = false",
        )
        .bind(product_id)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Soft-deleted product {}", product_id);
        Ok(())
    }

    async fn bulk_update(
        &self,
        updates: &[(Uuid, BulkProductUpdateItem)],
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;
        let mut updated = Vec::with_capacity(updates.len());

        for (product_id, item) in updates {
            let publish_stamp = matches!(item.status, Some(crate::model::ProductStatus::Published));

            let sql = format!(
                "UPDATE products \
                 SET base_price = COALESCE($2, base_price), \
                     stock_quantity = COALESCE($3, stock_quantity), \
                     status = COALESCE($4, status), \
                     publish_at = CASE WHEN $5 AND publish_at IS NULL THEN current_timestamp ELSE publish_at END, \
                     updated_at = current_timestamp \
                 WHERE product_id = $1 \
                 RETURNING {PRODUCT_RETURNING}"
            );
            let product = sqlx::query_as::<_, Product>(&sql)
                .bind(product_id)
                .bind(item.base_price)
                .bind(item.stock_quantity)
                .bind(item.status)
                .bind(publish_stamp)
                .fetch_optional(&mut *tx)
                .await
                .map_err(RepositoryError::from)?
                .ok_or(RepositoryError::NotFound)?;

            updated.push(product);
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("✅ Bulk-updated {} products", updated.len());
        Ok(updated)
    }

    async fn add_image(
        &self,
        product_id: Uuid,
        req: &CreateProductImageRequest,
    ) -> Result<ProductImage, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let image = sqlx::query_as::<_, ProductImage>(
            "INSERT INTO product_images (image_id, product_id, url, alt_text, sort_order, created_at) \
             VALUES ($1, $2, $3, $4, $5, current_timestamp) \
             RETURNING image_id, product_id, url, alt_text, sort_order, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(&req.url)
        .bind(&req.alt_text)
        .bind(req.sort_order)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to add image to product {}: {:?}", product_id, err);
            RepositoryError::from(err)
        })?;

        Ok(image)
    }

    async fn delete_image(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<ProductImage, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let image = sqlx::query_as::<_, ProductImage>(
            "DELETE FROM product_images WHERE image_id = $1 AND product_id = $2 \
             RETURNING image_id, product_id, url, alt_text, sort_order, created_at",
        )
        .bind(image_id)
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)?;

        info!("🗑️ Deleted image {} from product {}", image_id, product_id);
        Ok(image)
    }
}
