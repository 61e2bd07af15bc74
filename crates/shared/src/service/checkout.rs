use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::{
    abstract_trait::{
        DynAddressRepository, DynCartQueryRepository, DynOrderCommandRepository,
        DynOrderQueryRepository, NewOrderItem,
    },
    domain::{
        requests::CheckoutRequest,
        responses::{ApiResponse, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
};

#[derive(Clone)]
pub struct CheckoutService {
    cart_query: DynCartQueryRepository,
    order_query: DynOrderQueryRepository,
    order_command: DynOrderCommandRepository,
    addresses: DynAddressRepository,
    currency: String,
}

pub struct CheckoutServiceDeps {
    pub cart_query: DynCartQueryRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_command: DynOrderCommandRepository,
    pub addresses: DynAddressRepository,
    pub currency: String,
}

impl CheckoutService {
    pub fn new(deps: CheckoutServiceDeps) -> Self {
        let CheckoutServiceDeps {
            cart_query,
            order_query,
            order_command,
            addresses,
            currency,
        } = deps;

        Self {
            cart_query,
            order_query,
            order_command,
            addresses,
            currency,
        }
    }

    /// Freezes the user's cart into an order. Prices come from the cart's
    /// locked `unit_price_at_add`, not current catalog prices. The cart is
    /// left intact; a later payment flow clears it.
    pub async fn checkout(
        &self,
        user_id: Uuid,
        req: &CheckoutRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let cart = self
            .cart_query
            .find_by_user(user_id)
            .await?
            .ok_or(ServiceError::EmptyCart)?;

        let cart_items = self.cart_query.find_items(cart.cart_id).await?;
        if cart_items.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        self.check_address_ownership(user_id, req.shipping_address_id)
            .await?;
        self.check_address_ownership(user_id, req.billing_address_id)
            .await?;

        let mut total_amount = Decimal::ZERO;
        let mut items = Vec::with_capacity(cart_items.len());

        for cart_item in cart_items {
            let subtotal = cart_item.unit_price_at_add * Decimal::from(cart_item.quantity);
            total_amount += subtotal;

            items.push(NewOrderItem {
                product_id: cart_item.product_id,
                variant_id: cart_item.variant_id,
                quantity: cart_item.quantity,
                unit_price: cart_item.unit_price_at_add,
                subtotal,
            });
        }

        let (order, order_items) = self
            .order_command
            .create_order_with_items(
                user_id,
                total_amount,
                &self.currency,
                req.shipping_address_id,
                req.billing_address_id,
                &items,
            )
            .await?;

        info!(
            "✅ Created order {} for user {} ({} {})",
            order.order_id, user_id, total_amount, self.currency
        );

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Order created".to_string(),
            data: OrderResponse::from_parts(order, order_items),
        })
    }

    pub async fn find_all_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let orders = self.order_query.find_all_by_user(user_id).await?;
        let mut responses = Vec::with_capacity(orders.len());

        for order in orders {
            let items = self.order_query.find_items(order.order_id).await?;
            responses.push(OrderResponse::from_parts(order, items));
        }

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Orders retrieved".to_string(),
            data: responses,
        })
    }

    pub async fn find_by_id_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let order = self
            .order_query
            .find_by_id_for_user(order_id, user_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let items = self.order_query.find_items(order.order_id).await?;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Order retrieved".to_string(),
            data: OrderResponse::from_parts(order, items),
        })
    }

    async fn check_address_ownership(
        &self,
        user_id: Uuid,
        address_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let Some(address_id) = address_id else {
            return Ok(());
        };

        let address = self
            .addresses
            .find_by_id(address_id)
            .await?
            .ok_or(ServiceError::InvalidAddress)?;

        if address.user_id != user_id {
            return Err(ServiceError::InvalidAddress);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            AddressRepositoryTrait, CartQueryRepositoryTrait, OrderCommandRepositoryTrait,
            OrderQueryRepositoryTrait,
        },
        model::{Address, Cart, CartItem, Order, OrderItem},
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeCartRepo {
        carts: Vec<Cart>,
        items: Vec<CartItem>,
    }

    impl FakeCartRepo {
        fn with_cart_for(mut self, user_id: Uuid) -> (Self, Uuid) {
            let cart_id = Uuid::new_v4();
            self.carts.push(Cart {
                cart_id,
                user_id: Some(user_id),
                session_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            (self, cart_id)
        }

        fn with_item(mut self, cart_id: Uuid, quantity: i32, unit_price: &str) -> Self {
            self.items.push(CartItem {
                cart_item_id: Uuid::new_v4(),
                cart_id,
                product_id: Uuid::new_v4(),
                variant_id: None,
                quantity,
                unit_price_at_add: unit_price.parse().unwrap(),
                created_at: Utc::now(),
            });
            self
        }
    }

    #[async_trait]
    impl CartQueryRepositoryTrait for FakeCartRepo {
        async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
            Ok(self
                .carts
                .iter()
                .find(|c| c.user_id == Some(user_id))
                .cloned())
        }

        async fn find_by_session(
            &self,
            _session_id: &str,
        ) -> Result<Option<Cart>, RepositoryError> {
            Ok(None)
        }

        async fn find_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, RepositoryError> {
            Ok(self
                .items
                .iter()
                .filter(|i| i.cart_id == cart_id)
                .cloned()
                .collect())
        }

        async fn find_item(
            &self,
            _cart_id: Uuid,
            _item_id: Uuid,
        ) -> Result<Option<CartItem>, RepositoryError> {
            Ok(None)
        }

        async fn find_item_by_product(
            &self,
            _cart_id: Uuid,
            _product_id: Uuid,
            _variant_id: Option<Uuid>,
        ) -> Result<Option<CartItem>, RepositoryError> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct FakeOrderRepo {
        orders: Mutex<Vec<(Order, Vec<OrderItem>)>>,
    }

    #[async_trait]
    impl OrderQueryRepositoryTrait for FakeOrderRepo {
        async fn find_all_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .filter(|(o, _)| o.user_id == user_id)
                .map(|(o, _)| o.clone())
                .collect())
        }

        async fn find_by_id_for_user(
            &self,
            order_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<Order>, RepositoryError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|(o, _)| o.order_id == order_id && o.user_id == user_id)
                .map(|(o, _)| o.clone()))
        }

        async fn find_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepositoryError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|(o, _)| o.order_id == order_id)
                .map(|(_, items)| items.clone())
                .unwrap_or_default())
        }
    }

    #[async_trait]
    impl OrderCommandRepositoryTrait for FakeOrderRepo {
        async fn create_order_with_items(
            &self,
            user_id: Uuid,
            total_amount: Decimal,
            currency: &str,
            shipping_address_id: Option<Uuid>,
            billing_address_id: Option<Uuid>,
            items: &[NewOrderItem],
        ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
            let order = Order {
                order_id: Uuid::new_v4(),
                user_id,
                total_amount,
                currency: currency.to_string(),
                shipping_address_id,
                billing_address_id,
                created_at: Utc::now(),
            };
            let order_items: Vec<OrderItem> = items
                .iter()
                .map(|item| OrderItem {
                    order_item_id: Uuid::new_v4(),
                    order_id: order.order_id,
                    product_id: item.product_id,
                    variant_id: item.variant_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    subtotal: item.subtotal,
                })
                .collect();
            self.orders
                .lock()
                .unwrap()
                .push((order.clone(), order_items.clone()));
            Ok((order, order_items))
        }
    }

    struct FakeAddressRepo {
        addresses: Vec<Address>,
    }

    #[async_trait]
    impl AddressRepositoryTrait for FakeAddressRepo {
        async fn find_by_id(&self, address_id: Uuid) -> Result<Option<Address>, RepositoryError> {
            Ok(self
                .addresses
                .iter()
                .find(|a| a.address_id == address_id)
                .cloned())
        }
    }

    fn address_for(user_id: Uuid) -> Address {
        Address {
            address_id: Uuid::new_v4(),
            user_id,
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            postal_code: "12345".to_string(),
            country: "US".to_string(),
            created_at: Utc::now(),
        }
    }

    fn build_service(
        cart_repo: FakeCartRepo,
        order_repo: Arc<FakeOrderRepo>,
        addresses: Vec<Address>,
    ) -> CheckoutService {
        CheckoutService::new(CheckoutServiceDeps {
            cart_query: Arc::new(cart_repo),
            order_query: order_repo.clone(),
            order_command: order_repo,
            addresses: Arc::new(FakeAddressRepo { addresses }),
            currency: "USD".to_string(),
        })
    }

    #[tokio::test]
    async fn checkout_totals_follow_locked_cart_prices() {
        let user_id = Uuid::new_v4();
        let (cart_repo, cart_id) = FakeCartRepo::default().with_cart_for(user_id);
        let cart_repo = cart_repo
            .with_item(cart_id, 2, "10.50")
            .with_item(cart_id, 1, "15.50");
        let service = build_service(cart_repo, Arc::new(FakeOrderRepo::default()), Vec::new());

        let res = service
            .checkout(
                user_id,
                &CheckoutRequest {
                    shipping_address_id: None,
                    billing_address_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(res.data.total_amount, "36.50".parse::<Decimal>().unwrap());
        assert_eq!(res.data.items.len(), 2);
        assert_eq!(res.data.currency, "USD");
    }

    #[tokio::test]
    async fn checkout_rejects_missing_cart() {
        let service = build_service(
            FakeCartRepo::default(),
            Arc::new(FakeOrderRepo::default()),
            Vec::new(),
        );

        let err = service
            .checkout(
                Uuid::new_v4(),
                &CheckoutRequest {
                    shipping_address_id: None,
                    billing_address_id: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::EmptyCart));
    }

    #[tokio::test]
    async fn checkout_rejects_empty_cart() {
        let user_id = Uuid::new_v4();
        let (cart_repo, _) = FakeCartRepo::default().with_cart_for(user_id);
        let service = build_service(cart_repo, Arc::new(FakeOrderRepo::default()), Vec::new());

        let err = service
            .checkout(
                user_id,
                &CheckoutRequest {
                    shipping_address_id: None,
                    billing_address_id: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::EmptyCart));
    }

    #[tokio::test]
    async fn checkout_rejects_address_of_another_user() {
        let user_id = Uuid::new_v4();
        let (cart_repo, cart_id) = FakeCartRepo::default().with_cart_for(user_id);
        let cart_repo = cart_repo.with_item(cart_id, 1, "10.00");
        let foreign_address = address_for(Uuid::new_v4());
        let foreign_id = foreign_address.address_id;
        let service = build_service(
            cart_repo,
            Arc::new(FakeOrderRepo::default()),
            vec![foreign_address],
        );

        let err = service
            .checkout(
                user_id,
                &CheckoutRequest {
                    shipping_address_id: Some(foreign_id),
                    billing_address_id: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidAddress));
    }

    #[tokio::test]
    async fn checkout_accepts_own_address() {
        let user_id = Uuid::new_v4();
        let (cart_repo, cart_id) = FakeCartRepo::default().with_cart_for(user_id);
        let cart_repo = cart_repo.with_item(cart_id, 1, "10.00");
        let address = address_for(user_id);
        let address_id = address.address_id;
        let service = build_service(cart_repo, Arc::new(FakeOrderRepo::default()), vec![address]);

        let res = service
            .checkout(
                user_id,
                &CheckoutRequest {
                    shipping_address_id: Some(address_id),
                    billing_address_id: Some(address_id),
                },
            )
            .await
            .unwrap();

        assert_eq!(res.data.shipping_address_id, Some(address_id));
    }

    #[tokio::test]
    async fn order_lookup_is_scoped_to_the_owner() {
        let user_id = Uuid::new_v4();
        let (cart_repo, cart_id) = FakeCartRepo::default().with_cart_for(user_id);
        let cart_repo = cart_repo.with_item(cart_id, 1, "10.00");
        let order_repo = Arc::new(FakeOrderRepo::default());
        let service = build_service(cart_repo, order_repo, Vec::new());

        let res = service
            .checkout(
                user_id,
                &CheckoutRequest {
                    shipping_address_id: None,
                    billing_address_id: None,
                },
            )
            .await
            .unwrap();

        let err = service
            .find_by_id_for_user(res.data.id, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Repo(RepositoryError::NotFound)));
    }
}
