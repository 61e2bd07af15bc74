use crate::model::{Cart, CartItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price_at_add: Decimal,
}

impl From<CartItem> for CartItemResponse {
    fn from(value: CartItem) -> Self {
        CartItemResponse {
            id: value.cart_item_id,
            product_id: value.product_id,
            variant_id: value.variant_id,
            quantity: value.quantity,
            unit_price_at_add: value.unit_price_at_add,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_id: Option<String>,
    pub items: Vec<CartItemResponse>,
}

impl CartResponse {
    pub fn from_parts(cart: Cart, items: Vec<CartItem>) -> Self {
        CartResponse {
            id: cart.cart_id,
            user_id: cart.user_id,
            session_id: cart.session_id,
            items: items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}
