mod database;
mod jwt;
mod myconfig;
mod stripe;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::jwt::{Claims, JwtConfig};
pub use self::myconfig::{Config, StorageConfig, StripeConfig};
pub use self::stripe::StripeGateway;
