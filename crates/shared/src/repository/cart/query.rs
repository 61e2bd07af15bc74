use crate::{
    abstract_trait::CartQueryRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Cart, CartItem},
};
use async_trait::async_trait;
use tracing::error;
use uuid::Uuid;

const CART_COLUMNS: &str = "cart_id, user_id, session_id, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "cart_item_id, cart_id, product_id, variant_id, quantity, unit_price_at_add, created_at";

pub struct CartQueryRepository {
    db: ConnectionPool,
}

impl CartQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartQueryRepositoryTrait for CartQueryRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1");
        let cart = sqlx::query_as::<_, Cart>(&sql)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch cart for user {}: {:?}", user_id, err);
                RepositoryError::from(err)
            })?;

        Ok(cart)
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {CART_COLUMNS} FROM carts WHERE session_id = $1");
        let cart = sqlx::query_as::<_, Cart>(&sql)
            .bind(session_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(cart)
    }

    async fn find_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY created_at"
        );
        let items = sqlx::query_as::<_, CartItem>(&sql)
            .bind(cart_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch items for cart {}: {:?}", cart_id, err);
                RepositoryError::from(err)
            })?;

        Ok(items)
    }

    async fn find_item(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_item_id = $1 AND cart_id = $2"
        );
        let item = sqlx::query_as::<_, CartItem>(&sql)
            .bind(item_id)
            .bind(cart_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(item)
    }

    async fn find_item_by_product(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        variant_id: Option<Uuid>,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items \
             WHERE cart_id = $1 AND product_id = $2 AND variant_id IS NOT DISTINCT FROM $3"
        );
        let item = sqlx::query_as::<_, CartItem>(&sql)
            .bind(cart_id)
            .bind(product_id)
            .bind(variant_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        Ok(item)
    }
}
