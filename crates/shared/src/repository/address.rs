use crate::{
    abstract_trait::AddressRepositoryTrait, config::ConnectionPool, errors::RepositoryError,
    model::Address,
};
use async_trait::async_trait;
use uuid::Uuid;

pub struct AddressRepository {
    db: ConnectionPool,
}

impl AddressRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepositoryTrait for AddressRepository {
    async fn find_by_id(&self, address_id: Uuid) -> Result<Option<Address>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let address = sqlx::query_as::<_, Address>(
            "SELECT address_id, user_id, line1, line2, city, postal_code, country, created_at \
             FROM addresses WHERE address_id = $1",
        )
        .bind(address_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(address)
    }
}
