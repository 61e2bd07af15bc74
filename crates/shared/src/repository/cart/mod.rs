mod command;
mod query;

use crate::{
    abstract_trait::{DynCartCommandRepository, DynCartQueryRepository},
    config::ConnectionPool,
};
use std::sync::Arc;

pub use self::command::CartCommandRepository;
pub use self::query::CartQueryRepository;

#[derive(Clone)]
pub struct CartRepository {
    pub query: DynCartQueryRepository,
    pub command: DynCartCommandRepository,
}

impl CartRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self {
            query: Arc::new(CartQueryRepository::new(db.clone())),
            command: Arc::new(CartCommandRepository::new(db)),
        }
    }
}
