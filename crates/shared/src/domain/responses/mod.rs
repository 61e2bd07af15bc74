mod api;
mod cart;
mod catalog;
mod order;
mod payment;

pub use self::api::ApiResponse;
pub use self::cart::{CartItemResponse, CartResponse};
pub use self::catalog::{
    CategoryResponse, ProductImageResponse, ProductResponse, ProductVariantResponse,
};
pub use self::order::{OrderItemResponse, OrderResponse};
pub use self::payment::{PaymentIntentResponse, WebhookAckResponse};
