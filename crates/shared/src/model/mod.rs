mod address;
mod cart;
mod catalog;
mod order;

pub use self::address::Address;
pub use self::cart::{Cart, CartItem};
pub use self::catalog::{Category, Product, ProductImage, ProductStatus, ProductVariant};
pub use self::order::{Order, OrderItem};
