use crate::model::ProductStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 120, message = "Slug must be 1-120 characters"))]
    pub slug: String,

    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(max = 120, message = "Name must be at most 120 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductVariantRequest {
    #[validate(length(min = 1, max = 120, message = "Variant name must be 1-120 characters"))]
    pub name: String,

    #[serde(default)]
    pub price_delta: Decimal,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductImageRequest {
    #[validate(length(min = 1, max = 500, message = "URL must be 1-500 characters"))]
    pub url: String,

    #[validate(length(max = 255, message = "Alt text must be at most 255 characters"))]
    pub alt_text: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 160, message = "Slug must be 1-160 characters"))]
    pub slug: String,

    #[validate(length(min = 3, max = 64, message = "SKU must be 3-64 characters"))]
    pub sku: Option<String>,

    #[validate(length(min = 1, max = 160, message = "Name must be 1-160 characters"))]
    pub name: String,

    #[validate(length(max = 280, message = "Short description must be at most 280 characters"))]
    pub short_description: Option<String>,

    pub long_description: Option<String>,

    pub base_price: Decimal,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub is_featured: bool,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock_quantity: i32,

    #[serde(default = "default_status")]
    pub status: ProductStatus,

    #[validate(nested)]
    #[serde(default)]
    pub images: Vec<CreateProductImageRequest>,

    #[validate(nested)]
    #[serde(default)]
    pub variants: Vec<CreateProductVariantRequest>,
}

fn default_true() -> bool {
    true
}

fn default_status() -> ProductStatus {
    ProductStatus::Draft
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(max = 160, message = "Name must be at most 160 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 160, message = "Slug must be 1-160 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 3, max = 64, message = "SKU must be 3-64 characters"))]
    pub sku: Option<String>,

    #[validate(length(max = 280, message = "Short description must be at most 280 characters"))]
    pub short_description: Option<String>,

    pub long_description: Option<String>,

    pub base_price: Option<Decimal>,

    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,

    pub is_active: Option<bool>,

    pub is_featured: Option<bool>,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock_quantity: Option<i32>,

    pub category_id: Option<Uuid>,

    pub status: Option<ProductStatus>,

    pub publish_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkProductUpdateRequest {
    #[validate(length(min = 1, message = "At least one update is required"), nested)]
    pub items: Vec<BulkProductUpdateItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkProductUpdateItem {
    pub product_id: Uuid,

    pub base_price: Option<Decimal>,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock_quantity: Option<i32>,

    pub status: Option<ProductStatus>,
}
