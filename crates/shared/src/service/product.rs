use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    abstract_trait::{DynProductCommandRepository, DynProductQueryRepository},
    domain::{
        requests::{
            BulkProductUpdateItem, CreateProductImageRequest, CreateProductRequest,
            UpdateProductRequest,
        },
        responses::{ApiResponse, ProductImageResponse, ProductResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Product, ProductStatus},
    service::storage::StorageService,
    utils::generate_random_digits,
};

const SKU_GENERATION_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct ProductService {
    query: DynProductQueryRepository,
    command: DynProductCommandRepository,
    storage: StorageService,
}

pub struct ProductServiceDeps {
    pub query: DynProductQueryRepository,
    pub command: DynProductCommandRepository,
    pub storage: StorageService,
}

impl ProductService {
    pub fn new(deps: ProductServiceDeps) -> Self {
        let ProductServiceDeps {
            query,
            command,
            storage,
        } = deps;

        Self {
            query,
            command,
            storage,
        }
    }

    pub async fn find_all(&self) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let products = self.query.find_all_active().await?;
        let mut responses = Vec::with_capacity(products.len());

        for product in products {
            let images = self.query.find_images(product.product_id).await?;
            let variants = self.query.find_variants(product.product_id).await?;
            responses.push(ProductResponse::from_parts(product, images, variants));
        }

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Products retrieved".to_string(),
            data: responses,
        })
    }

    pub async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let product = self
            .query
            .find_by_slug(slug)
            .await?
            .filter(|p| !p.is_deleted && p.is_active)
            .ok_or(RepositoryError::NotFound)?;

        self.respond_with(product, "Product retrieved").await
    }

    pub async fn create(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        if self.query.find_by_slug(&req.slug).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(format!(
                "Product with slug '{}' already exists",
                req.slug
            ))
            .into());
        }

        let sku = match &req.sku {
            Some(sku) => {
                if self.query.find_by_sku(sku).await?.is_some() {
                    return Err(RepositoryError::AlreadyExists(format!(
                        "Product with SKU '{sku}' already exists"
                    ))
                    .into());
                }
                sku.clone()
            }
            None => self.generate_sku(&req.slug).await?,
        };

        let product = self.command.create_product(req, &sku).await?;

        self.respond_with(product, "Product created").await
    }

    pub async fn update(
        &self,
        product_id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let mut product = self
            .query
            .find_by_id(product_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if let Some(slug) = &req.slug {
            if *slug != product.slug && self.query.find_by_slug(slug).await?.is_some() {
                return Err(RepositoryError::AlreadyExists(format!(
                    "Product with slug '{slug}' already exists"
                ))
                .into());
            }
            product.slug = slug.clone();
        }

        if let Some(sku) = &req.sku {
            if *sku != product.sku && self.query.find_by_sku(sku).await?.is_some() {
                return Err(RepositoryError::AlreadyExists(format!(
                    "Product with SKU '{sku}' already exists"
                ))
                .into());
            }
            product.sku = sku.clone();
        }

        if let Some(name) = &req.name {
            product.name = name.clone();
        }
        if let Some(short_description) = &req.short_description {
            product.short_description = Some(short_description.clone());
        }
        if let Some(long_description) = &req.long_description {
            product.long_description = Some(long_description.clone());
        }
        if let Some(base_price) = req.base_price {
            product.base_price = base_price;
        }
        if let Some(currency) = &req.currency {
            product.currency = currency.clone();
        }
        if let Some(is_active) = req.is_active {
            product.is_active = is_active;
        }
        if let Some(is_featured) = req.is_featured {
            product.is_featured = is_featured;
        }
        if let Some(stock_quantity) = req.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(category_id) = req.category_id {
            product.category_id = category_id;
        }
        if let Some(publish_at) = req.publish_at {
            product.publish_at = Some(publish_at);
        }
        if let Some(status) = req.status {
            product.status = status;
            // First transition to published stamps the publication time.
            if status == ProductStatus::Published && product.publish_at.is_none() {
                product.publish_at = Some(Utc::now());
            }
        }

        let product = self.command.update_product(&product).await?;

        self.respond_with(product, "Product updated").await
    }

    pub async fn delete(&self, product_id: Uuid) -> Result<(), ServiceError> {
        self.command.soft_delete_product(product_id).await?;
        Ok(())
    }

    pub async fn bulk_update(
        &self,
        items: &[BulkProductUpdateItem],
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let updates: Vec<(Uuid, BulkProductUpdateItem)> = items
            .iter()
            .map(|item| (item.product_id, item.clone()))
            .collect();

        let products = self.command.bulk_update(&updates).await?;
        let mut responses = Vec::with_capacity(products.len());

        for product in products {
            let images = self.query.find_images(product.product_id).await?;
            let variants = self.query.find_variants(product.product_id).await?;
            responses.push(ProductResponse::from_parts(product, images, variants));
        }

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Products updated".to_string(),
            data: responses,
        })
    }

    pub async fn add_image(
        &self,
        product_id: Uuid,
        req: &CreateProductImageRequest,
    ) -> Result<ApiResponse<ProductImageResponse>, ServiceError> {
        self.query
            .find_by_id(product_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let image = self.command.add_image(product_id, req).await?;

        info!("✅ Added image {} to product {}", image.image_id, product_id);

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Image added".to_string(),
            data: ProductImageResponse::from(image),
        })
    }

    pub async fn delete_image(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), ServiceError> {
        let image = self.command.delete_image(product_id, image_id).await?;

        // The row is gone either way; a stale file on disk is only logged.
        if let Err(err) = self.storage.delete_file(&image.url).await {
            warn!("Failed to remove stored file {}: {}", image.url, err);
        }

        Ok(())
    }

    async fn respond_with(
        &self,
        product: Product,
        message: &str,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let images = self.query.find_images(product.product_id).await?;
        let variants = self.query.find_variants(product.product_id).await?;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: message.to_string(),
            data: ProductResponse::from_parts(product, images, variants),
        })
    }

    /// Derives a SKU candidate from the slug plus a random numeric suffix,
    /// retrying on the unlikely collision.
    async fn generate_sku(&self, slug: &str) -> Result<String, ServiceError> {
        let prefix: String = slug
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect::<String>()
            .to_ascii_uppercase();
        let prefix = if prefix.is_empty() {
            "PRODUCT".to_string()
        } else {
            prefix
        };

        for _ in 0..SKU_GENERATION_ATTEMPTS {
            let suffix = generate_random_digits(4)
                .map_err(|err| ServiceError::Internal(format!("Failed to generate SKU: {err}")))?;
            let candidate = format!("{prefix}-{suffix}");

            if self.query.find_by_sku(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(ServiceError::Internal(
            "Could not generate a unique SKU".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductImage, ProductVariant};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeProductRepo {
        products: Mutex<Vec<Product>>,
        images: Mutex<Vec<ProductImage>>,
    }

    impl FakeProductRepo {
        fn seed_product(&self, slug: &str, sku: &str, status: ProductStatus) -> Product {
            let product = Product {
                product_id: Uuid::new_v4(),
                category_id: Uuid::new_v4(),
                sku: sku.to_string(),
                slug: slug.to_string(),
                name: "Widget".to_string(),
                short_description: None,
                long_description: None,
                base_price: "10.00".parse().unwrap(),
                currency: "USD".to_string(),
                is_active: true,
                is_featured: false,
                stock_quantity: 5,
                is_deleted: false,
                status,
                publish_at: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.products.lock().unwrap().push(product.clone());
            product
        }
    }

    #[async_trait]
    impl crate::abstract_trait::ProductQueryRepositoryTrait for FakeProductRepo {
        async fn find_by_id(&self, product_id: Uuid) -> Result<Option<Product>, RepositoryError> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.product_id == product_id)
                .cloned())
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.slug == slug)
                .cloned())
        }

        async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.sku == sku)
                .cloned())
        }

        async fn find_all_active(&self) -> Result<Vec<Product>, RepositoryError> {
            Ok(self.products.lock().unwrap().clone())
        }

        async fn find_images(
            &self,
            product_id: Uuid,
        ) -> Result<Vec<ProductImage>, RepositoryError> {
            Ok(self
                .images
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.product_id == product_id)
                .cloned()
                .collect())
        }

        async fn find_variants(
            &self,
            _product_id: Uuid,
        ) -> Result<Vec<ProductVariant>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find_variant(
            &self,
            _variant_id: Uuid,
        ) -> Result<Option<ProductVariant>, RepositoryError> {
            Ok(None)
        }
    }

    #[async_trait]
    impl crate::abstract_trait::ProductCommandRepositoryTrait for FakeProductRepo {
        async fn create_product(
            &self,
            req: &CreateProductRequest,
            sku: &str,
        ) -> Result<Product, RepositoryError> {
            Ok(self.seed_product(&req.slug, sku, req.status))
        }

        async fn update_product(&self, product: &Product) -> Result<Product, RepositoryError> {
            let mut products = self.products.lock().unwrap();
            let slot = products
                .iter_mut()
                .find(|p| p.product_id == product.product_id)
                .ok_or(RepositoryError::NotFound)?;
            *slot = product.clone();
            Ok(product.clone())
        }

        async fn soft_delete_product(&self, product_id: Uuid) -> Result<(), RepositoryError> {
            let mut products = self.products.lock().unwrap();
            let slot = products
                .iter_mut()
                .find(|p| p.product_id == product_id && !p.is_deleted)
                .ok_or(RepositoryError::NotFound)?;
            slot.is_deleted = true;
            Ok(())
        }

        async fn bulk_update(
            &self,
            updates: &[(Uuid, BulkProductUpdateItem)],
        ) -> Result<Vec<Product>, RepositoryError> {
            let mut products = self.products.lock().unwrap();
            let mut updated = Vec::new();
            for (product_id, item) in updates {
                let slot = products
                    .iter_mut()
                    .find(|p| p.product_id == *product_id)
                    .ok_or(RepositoryError::NotFound)?;
                if let Some(price) = item.base_price {
                    slot.base_price = price;
                }
                if let Some(stock) = item.stock_quantity {
                    slot.stock_quantity = stock;
                }
                if let Some(status) = item.status {
                    slot.status = status;
                }
                updated.push(slot.clone());
            }
            Ok(updated)
        }

        async fn add_image(
            &self,
            product_id: Uuid,
            req: &CreateProductImageRequest,
        ) -> Result<ProductImage, RepositoryError> {
            let image = ProductImage {
                image_id: Uuid::new_v4(),
                product_id,
                url: req.url.clone(),
                alt_text: req.alt_text.clone(),
                sort_order: req.sort_order,
                created_at: Utc::now(),
            };
            self.images.lock().unwrap().push(image.clone());
            Ok(image)
        }

        async fn delete_image(
            &self,
            product_id: Uuid,
            image_id: Uuid,
        ) -> Result<ProductImage, RepositoryError> {
            let mut images = self.images.lock().unwrap();
            let pos = images
                .iter()
                .position(|i| i.product_id == product_id && i.image_id == image_id)
                .ok_or(RepositoryError::NotFound)?;
            Ok(images.remove(pos))
        }
    }

    fn build_service(repo: Arc<FakeProductRepo>) -> ProductService {
        let dir = tempfile::tempdir().unwrap();
        ProductService::new(ProductServiceDeps {
            query: repo.clone(),
            command: repo,
            storage: StorageService::new(&crate::config::StorageConfig {
                media_root: dir.keep(),
                max_upload_bytes: 1024,
                allowed_content_types: vec!["image/png".to_string()],
            }),
        })
    }

    fn create_request(slug: &str, sku: Option<&str>) -> CreateProductRequest {
        CreateProductRequest {
            category_id: Uuid::new_v4(),
            slug: slug.to_string(),
            sku: sku.map(str::to_string),
            name: "Widget".to_string(),
            short_description: None,
            long_description: None,
            base_price: "10.00".parse().unwrap(),
            currency: "USD".to_string(),
            is_active: true,
            is_featured: false,
            stock_quantity: 5,
            status: ProductStatus::Draft,
            images: Vec::new(),
            variants: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_slug() {
        let repo = Arc::new(FakeProductRepo::default());
        repo.seed_product("widget", "WID-0001", ProductStatus::Draft);
        let service = build_service(repo);

        let err = service
            .create(&create_request("widget", None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn create_generates_sku_from_slug_when_absent() {
        let repo = Arc::new(FakeProductRepo::default());
        let service = build_service(repo);

        let res = service
            .create(&create_request("cool-widget", None))
            .await
            .unwrap();

        let sku = res.data.sku;
        let (prefix, suffix) = sku.split_once('-').unwrap();
        assert_eq!(prefix, "COOLWIDG");
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_sku() {
        let repo = Arc::new(FakeProductRepo::default());
        repo.seed_product("other", "WID-0001", ProductStatus::Draft);
        let service = build_service(repo);

        let err = service
            .create(&create_request("widget", Some("WID-0001")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Repo(RepositoryError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn publishing_stamps_publish_at_once() {
        let repo = Arc::new(FakeProductRepo::default());
        let product = repo.seed_product("widget", "WID-0001", ProductStatus::Draft);
        let service = build_service(repo);

        let update = UpdateProductRequest {
            name: None,
            slug: None,
            sku: None,
            short_description: None,
            long_description: None,
            base_price: None,
            currency: None,
            is_active: None,
            is_featured: None,
            stock_quantity: None,
            category_id: None,
            status: Some(ProductStatus::Published),
            publish_at: None,
        };

        let res = service.update(product.product_id, &update).await.unwrap();
        let first_publish = res.data.publish_at.clone().unwrap();

        // Re-publishing must not move the original timestamp.
        let res = service.update(product.product_id, &update).await.unwrap();
        assert_eq!(res.data.publish_at.unwrap(), first_publish);
    }

    #[tokio::test]
    async fn delete_image_removes_row_and_tolerates_missing_file() {
        let repo = Arc::new(FakeProductRepo::default());
        let product = repo.seed_product("widget", "WID-0001", ProductStatus::Draft);
        let service = build_service(repo.clone());

        let image = service
            .add_image(
                product.product_id,
                &CreateProductImageRequest {
                    url: "never-stored.png".to_string(),
                    alt_text: None,
                    sort_order: 0,
                },
            )
            .await
            .unwrap();

        service
            .delete_image(product.product_id, image.data.id)
            .await
            .unwrap();

        assert!(repo.images.lock().unwrap().is_empty());
    }
}
