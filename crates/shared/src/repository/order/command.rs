use crate::{
    abstract_trait::{NewOrderItem, OrderCommandRepositoryTrait},
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Order, OrderItem},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order_with_items(
        &self,
        user_id: Uuid,
        total_amount: Decimal,
        currency: &str,
        shipping_address_id: Option<Uuid>,
        billing_address_id: Option<Uuid>,
        items: &[NewOrderItem],
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (order_id, user_id, total_amount, currency, shipping_address_id, \
             billing_address_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, current_timestamp) \
             RETURNING order_id, user_id, total_amount, currency, shipping_address_id, \
             billing_address_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(total_amount)
        .bind(currency)
        .bind(shipping_address_id)
        .bind(billing_address_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to create order for user {}: {:?}", user_id, err);
            RepositoryError::from(err)
        })?;

        let mut order_items = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items (order_item_id, order_id, product_id, variant_id, \
                 quantity, unit_price, subtotal) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING order_item_id, order_id, product_id, variant_id, quantity, unit_price, \
                 subtotal",
            )
            .bind(Uuid::new_v4())
            .bind(order.order_id)
            .bind(item.product_id)
            .bind(item.variant_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .fetch_one(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            order_items.push(row);
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(
            "✅ Created order {} for user {} ({} items, total {})",
            order.order_id,
            user_id,
            order_items.len(),
            total_amount
        );
        Ok((order, order_items))
    }
}
