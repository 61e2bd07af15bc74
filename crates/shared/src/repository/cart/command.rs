use crate::{
    abstract_trait::{CartCommandRepositoryTrait, MergeLine},
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Cart, CartItem},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

const CART_RETURNING: &str = "cart_id, user_id, session_id, created_at, updated_at";
const ITEM_RETURNING: &str =
    "cart_item_id, cart_id, product_id, variant_id, quantity, unit_price_at_add, created_at";

pub struct CartCommandRepository {
    db: ConnectionPool,
}

impl CartCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartCommandRepositoryTrait for CartCommandRepository {
    async fn create_cart(
        &self,
        user_id: Option<Uuid>,
        session_id: Option<&str>,
    ) -> Result<Cart, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "INSERT INTO carts (cart_id, user_id, session_id, created_at, updated_at) \
             VALUES ($1, $2, $3, current_timestamp, current_timestamp) \
             RETURNING {CART_RETURNING}"
        );
        let cart = sqlx::query_as::<_, Cart>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(session_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to create cart: {:?}", err);
                RepositoryError::from(err)
            })?;

        info!("✅ Created cart {}", cart.cart_id);
        Ok(cart)
    }

    async fn insert_item(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
        quantity: i32,
        unit_price_at_add: Decimal,
    ) -> Result<CartItem, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "INSERT INTO cart_items (cart_item_id, cart_id, product_id, variant_id, quantity, \
             unit_price_at_add, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, current_timestamp) \
             RETURNING {ITEM_RETURNING}"
        );
        let item = sqlx::query_as::<_, CartItem>(&sql)
            .bind(Uuid::new_v4())
            .bind(cart_id)
            .bind(product_id)
            .bind(variant_id)
            .bind(quantity)
            .bind(unit_price_at_add)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to add item to cart {}: {:?}", cart_id, err);
                RepositoryError::from(err)
            })?;

        info!("✅ Added item {} to cart {}", item.cart_item_id, cart_id);
        Ok(item)
    }

    async fn set_item_quantity(
        &self,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "UPDATE cart_items SET quantity = $2 WHERE cart_item_id = $1 \
             RETURNING {ITEM_RETURNING}"
        );
        let item = sqlx::query_as::<_, CartItem>(&sql)
            .bind(item_id)
            .bind(quantity)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?
            .ok_or(RepositoryError::NotFound)?;

        info!("🔄 Updated quantity of cart item {}", item_id);
        Ok(item)
    }

    async fn delete_item(&self, cart_id: Uuid, item_id: Uuid) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            "DELETE FROM cart_items WHERE cart_item_id = $1 AND cart_id = $2",
        )
        .bind(item_id)
        .bind(cart_id)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Removed item {} from cart {}", item_id, cart_id);
        Ok(())
    }

    async fn apply_merge(
        &self,
        target_cart_id: Uuid,
        guest_cart_id: Uuid,
        plan: &[MergeLine],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        for line in plan {
            match line.existing_item_id {
                Some(item_id) => {
                    sqlx::query("UPDATE cart_items SET quantity = $2 WHERE cart_item_id = $1")
                        .bind(item_id)
                        .bind(line.quantity)
                        .execute(&mut *tx)
                        .await
                        .map_err(RepositoryError::from)?;
                }
                None => {
                    sqlx::query(
                        "INSERT INTO cart_items (cart_item_id, cart_id, product_id, variant_id, \
                         quantity, unit_price_at_add, created_at) \
                         VALUES ($1, $2, $3, $4, $5, $6, current_timestamp)",
                    )
                    .bind(Uuid::new_v4())
                    .bind(target_cart_id)
                    .bind(line.product_id)
                    .bind(line.variant_id)
                    .bind(line.quantity)
                    .bind(line.unit_price_at_add)
                    .execute(&mut *tx)
                    .await
                    .map_err(RepositoryError::from)?;
                }
            }
        }

        // Cascade removes the guest cart's items.
        sqlx::query("DELETE FROM carts WHERE cart_id = $1")
            .bind(guest_cart_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(|err| {
            error!(
                "❌ Failed to commit merge of cart {} into {}: {:?}",
                guest_cart_id, target_cart_id, err
            );
            RepositoryError::from(err)
        })?;

        info!("✅ Merged cart {} into cart {}", guest_cart_id, target_cart_id);
        Ok(())
    }
}
