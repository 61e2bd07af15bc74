use crate::{
    errors::RepositoryError,
    model::{Cart, CartItem},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

pub type DynCartQueryRepository = Arc<dyn CartQueryRepositoryTrait + Send + Sync>;
pub type DynCartCommandRepository = Arc<dyn CartCommandRepositoryTrait + Send + Sync>;

/// One line of a validated guest-cart merge plan. Built by the cart service
/// after stock validation, applied atomically by the command repository.
#[derive(Debug, Clone)]
pub struct MergeLine {
    /// Set when the target cart already holds a line for this
    /// `(product, variant)` pair; the quantities are combined on that line.
    pub existing_item_id: Option<Uuid>,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price_at_add: Decimal,
}

#[async_trait]
pub trait CartQueryRepositoryTrait {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError>;
    async fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>, RepositoryError>;
    async fn find_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, RepositoryError>;
    async fn find_item(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<CartItem>, RepositoryError>;
    async fn find_item_by_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
    ) -> Result<Option<CartItem>, RepositoryError>;
}

#[async_trait]
pub trait CartCommandRepositoryTrait {
    async fn create_cart(
        &self,
        user_id: Option<Uuid>,
        session_id: Option<&str>,
    ) -> Result<Cart, RepositoryError>;
    async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        quantity: i32,
        unit_price_at_add: Decimal,
    ) -> Result<CartItem, RepositoryError>;
    async fn set_item_quantity(
        &self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError>;
    async fn delete_item(&self, cart_id: Uuid, item_id: Uuid) -> Result<(), RepositoryError>;
    /// Applies every merge line and deletes the guest cart in one transaction.
    async fn apply_merge(
        &self,
        target_cart_id: Uuid,
        guest_cart_id: Uuid,
        plan: &[MergeLine],
    ) -> Result<(), RepositoryError>;
}
