mod address;
mod cart;
mod category;
mod order;
mod product;

pub use self::address::AddressRepository;
pub use self::cart::CartRepository;
pub use self::category::CategoryRepository;
pub use self::order::OrderRepository;
pub use self::product::ProductRepository;
