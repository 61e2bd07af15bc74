use crate::model::{Category, Product, ProductImage, ProductStatus, ProductVariant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        CategoryResponse {
            id: value.category_id,
            slug: value.slug,
            name: value.name,
            description: value.description,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductImageResponse {
    pub id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    pub sort_order: i32,
}

impl From<ProductImage> for ProductImageResponse {
    fn from(value: ProductImage) -> Self {
        ProductImageResponse {
            id: value.image_id,
            url: value.url,
            alt_text: value.alt_text,
            sort_order: value.sort_order,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductVariantResponse {
    pub id: Uuid,
    pub name: String,
    pub price_delta: Decimal,
    pub stock_quantity: i32,
}

impl From<ProductVariant> for ProductVariantResponse {
    fn from(value: ProductVariant) -> Self {
        ProductVariantResponse {
            id: value.variant_id,
            name: value.name,
            price_delta: value.price_delta,
            stock_quantity: value.stock_quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub sku: String,
    pub slug: String,
    pub name: String,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub base_price: Decimal,
    pub currency: String,
    pub is_active: bool,
    pub is_featured: bool,
    pub stock_quantity: i32,
    pub status: ProductStatus,
    pub publish_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub images: Vec<ProductImageResponse>,
    pub variants: Vec<ProductVariantResponse>,
}

impl ProductResponse {
    pub fn from_parts(
        product: Product,
        images: Vec<ProductImage>,
        variants: Vec<ProductVariant>,
    ) -> Self {
        ProductResponse {
            id: product.product_id,
            category_id: product.category_id,
            sku: product.sku,
            slug: product.slug,
            name: product.name,
            short_description: product.short_description,
            long_description: product.long_description,
            base_price: product.base_price,
            currency: product.currency,
            is_active: product.is_active,
            is_featured: product.is_featured,
            stock_quantity: product.stock_quantity,
            status: product.status,
            publish_at: product.publish_at.map(|dt| dt.to_rfc3339()),
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
            images: images.into_iter().map(ProductImageResponse::from).collect(),
            variants: variants
                .into_iter()
                .map(ProductVariantResponse::from)
                .collect(),
        }
    }
}
