use crate::{
    abstract_trait::{DynAddressRepository, DynCategoryRepository, DynPaymentGateway},
    config::{Config, ConnectionPool, StripeGateway},
    repository::{
        AddressRepository, CartRepository, CategoryRepository, OrderRepository, ProductRepository,
    },
    service::{
        CartService, CartServiceDeps, CategoryService, CheckoutService, CheckoutServiceDeps,
        PaymentService, ProductService, ProductServiceDeps, StorageService,
    },
};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub category_service: CategoryService,
    pub product_service: ProductService,
    pub cart_service: CartService,
    pub checkout_service: CheckoutService,
    pub payment_service: PaymentService,
    pub storage_service: StorageService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("category_service", &"<CategoryService>")
            .field("product_service", &"<ProductService>")
            .field("cart_service", &"<CartService>")
            .field("checkout_service", &"<CheckoutService>")
            .field("payment_service", &"<PaymentService>")
            .field("storage_service", &"<StorageService>")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(pool: ConnectionPool, config: &Config) -> Self {
        let category_repository =
            Arc::new(CategoryRepository::new(pool.clone())) as DynCategoryRepository;
        let product_repository = ProductRepository::new(pool.clone());
        let cart_repository = CartRepository::new(pool.clone());
        let order_repository = OrderRepository::new(pool.clone());
        let address_repository = Arc::new(AddressRepository::new(pool)) as DynAddressRepository;

        let storage_service = StorageService::new(&config.storage);
        let payment_gateway = Arc::new(StripeGateway::new(&config.stripe)) as DynPaymentGateway;

        let category_service = CategoryService::new(category_repository);

        let product_service = ProductService::new(ProductServiceDeps {
            query: product_repository.query.clone(),
            command: product_repository.command.clone(),
            storage: storage_service.clone(),
        });

        let cart_service = CartService::new(CartServiceDeps {
            query: cart_repository.query.clone(),
            command: cart_repository.command.clone(),
            product_query: product_repository.query.clone(),
        });

        let checkout_service = CheckoutService::new(CheckoutServiceDeps {
            cart_query: cart_repository.query.clone(),
            order_query: order_repository.query.clone(),
            order_command: order_repository.command.clone(),
            addresses: address_repository,
            currency: config.currency.clone(),
        });

        let payment_service = PaymentService::new(
            cart_repository.query.clone(),
            payment_gateway,
            config.currency.clone(),
        );

        Self {
            category_service,
            product_service,
            cart_service,
            checkout_service,
            payment_service,
            storage_service,
        }
    }
}
