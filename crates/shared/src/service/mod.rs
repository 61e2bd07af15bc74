mod cart;
mod category;
mod checkout;
mod payment;
mod product;
mod stock;
mod storage;

pub use self::cart::{CartService, CartServiceDeps};
pub use self::category::CategoryService;
pub use self::checkout::{CheckoutService, CheckoutServiceDeps};
pub use self::payment::PaymentService;
pub use self::product::{ProductService, ProductServiceDeps};
pub use self::stock::{InventorySnapshot, validate_stock};
pub use self::storage::{StorageService, StoredFile};
