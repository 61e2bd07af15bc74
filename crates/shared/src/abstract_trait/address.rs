use crate::{errors::RepositoryError, model::Address};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub type DynAddressRepository = Arc<dyn AddressRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait AddressRepositoryTrait {
    async fn find_by_id(&self, address_id: Uuid) -> Result<Option<Address>, RepositoryError>;
}
