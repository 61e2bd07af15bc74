mod address;
mod cart;
mod category;
mod jwt;
mod order;
mod payment;
mod product;

pub use self::address::{AddressRepositoryTrait, DynAddressRepository};
pub use self::cart::{
    CartCommandRepositoryTrait, CartQueryRepositoryTrait, DynCartCommandRepository,
    DynCartQueryRepository, MergeLine,
};
pub use self::category::{CategoryRepositoryTrait, DynCategoryRepository};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::order::{
    DynOrderCommandRepository, DynOrderQueryRepository, NewOrderItem, OrderCommandRepositoryTrait,
    OrderQueryRepositoryTrait,
};
pub use self::payment::{DynPaymentGateway, PaymentGatewayTrait, WebhookEvent};
pub use self::product::{
    DynProductCommandRepository, DynProductQueryRepository, ProductCommandRepositoryTrait,
    ProductQueryRepositoryTrait,
};
