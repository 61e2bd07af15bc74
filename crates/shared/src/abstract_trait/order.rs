use crate::{
    errors::RepositoryError,
    model::{Order, OrderItem},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;
pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

/// A frozen order line, computed by the checkout pipeline before persistence.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError>;
    async fn find_by_id_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, RepositoryError>;
    async fn find_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepositoryError>;
}

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Persists the order and all its items as a single transaction.
    async fn create_order_with_items(
        &self,
        user_id: Uuid,
        total_amount: Decimal,
        currency: &str,
        shipping_address_id: Option<Uuid>,
        billing_address_id: Option<Uuid>,
        items: &[NewOrderItem],
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError>;
}
