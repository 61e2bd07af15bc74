mod cart;
mod catalog;
mod order;

pub use self::cart::{AddCartItemRequest, UpdateCartItemRequest};
pub use self::catalog::{
    BulkProductUpdateItem, BulkProductUpdateRequest, CreateCategoryRequest,
    CreateProductImageRequest, CreateProductRequest, CreateProductVariantRequest,
    UpdateCategoryRequest, UpdateProductRequest,
};
pub use self::order::CheckoutRequest;
