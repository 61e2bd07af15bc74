use tracing::{error, info};
use uuid::Uuid;

use crate::{
    abstract_trait::{
        DynCartCommandRepository, DynCartQueryRepository, DynProductQueryRepository, MergeLine,
    },
    domain::{
        requests::{AddCartItemRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartItemResponse, CartResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Cart,
    service::stock::{InventorySnapshot, validate_stock},
};

#[derive(Clone)]
pub struct CartService {
    query: DynCartQueryRepository,
    command: DynCartCommandRepository,
    product_query: DynProductQueryRepository,
}

pub struct CartServiceDeps {
    pub query: DynCartQueryRepository,
    pub command: DynCartCommandRepository,
    pub product_query: DynProductQueryRepository,
}

impl CartService {
    pub fn new(deps: CartServiceDeps) -> Self {
        let CartServiceDeps {
            query,
            command,
            product_query,
        } = deps;

        Self {
            query,
            command,
            product_query,
        }
    }

    /// Resolves the effective unit price and stock pool for a product line.
    /// With a variant the price is base plus delta and stock comes from the
    /// variant; without one both come from the product itself.
    async fn lookup_inventory(
        &self,
        product_id: Uuid,
        variant_id: Option<Uuid>,
    ) -> Result<InventorySnapshot, ServiceError> {
        // Soft-deleted and deactivated products are not purchasable even
        // though admin lookups can still see them.
        let product = self
            .product_query
            .find_by_id(product_id)
            .await?
            .filter(|p| !p.is_deleted && p.is_active)
            .ok_or(RepositoryError::NotFound)?;

        match variant_id {
            Some(variant_id) => {
                let variant = self
                    .product_query
                    .find_variant(variant_id)
                    .await?
                    .filter(|v| v.product_id == product.product_id)
                    .ok_or(ServiceError::InvalidVariant)?;

                Ok(InventorySnapshot {
                    unit_price: product.base_price + variant.price_delta,
                    available_stock: variant.stock_quantity,
                })
            }
            None => Ok(InventorySnapshot {
                unit_price: product.base_price,
                available_stock: product.stock_quantity,
            }),
        }
    }

    pub async fn get_or_create(
        &self,
        user_id: Option<Uuid>,
        session_id: Option<&str>,
    ) -> Result<Cart, ServiceError> {
        if let Some(user_id) = user_id {
            if let Some(cart) = self.query.find_by_user(user_id).await? {
                return Ok(cart);
            }
        }

        if let Some(session_id) = session_id {
            if let Some(cart) = self.query.find_by_session(session_id).await? {
                return Ok(cart);
            }
        }

        // A cart is bound to exactly one identity: the user when known,
        // otherwise the guest session.
        let cart = if user_id.is_some() {
            self.command.create_cart(user_id, None).await?
        } else {
            self.command.create_cart(None, session_id).await?
        };

        info!("✅ Created cart {}", cart.cart_id);

        Ok(cart)
    }

    pub async fn get_cart(&self, cart: &Cart) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let items = self.query.find_items(cart.cart_id).await?;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Cart retrieved".to_string(),
            data: CartResponse::from_parts(cart.clone(), items),
        })
    }

    pub async fn add_item(
        &self,
        cart: &Cart,
        req: &AddCartItemRequest,
    ) -> Result<ApiResponse<CartItemResponse>, ServiceError> {
        let snapshot = self.lookup_inventory(req.product_id, req.variant_id).await?;

        let existing = self
            .query
            .find_item_by_product(cart.cart_id, req.product_id, req.variant_id)
            .await?;

        let item = match existing {
            // Same (product, variant) pair coalesces onto the existing line.
            // The unit price stays the one locked when the line was first
            // added.
            Some(existing) => {
                let combined = existing.quantity + req.quantity;
                validate_stock(combined, snapshot.available_stock)?;
                self.command
                    .set_item_quantity(existing.cart_item_id, combined)
                    .await?
            }
            None => {
                validate_stock(req.quantity, snapshot.available_stock)?;
                self.command
                    .insert_item(
                        cart.cart_id,
                        req.product_id,
                        req.variant_id,
                        req.quantity,
                        snapshot.unit_price,
                    )
                    .await?
            }
        };

        info!(
            "✅ Added product {} (qty {}) to cart {}",
            req.product_id, req.quantity, cart.cart_id
        );

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Item added to cart".to_string(),
            data: CartItemResponse::from(item),
        })
    }

    pub async fn update_item(
        &self,
        cart: &Cart,
        item_id: Uuid,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartItemResponse>, ServiceError> {
        let item = self
            .query
            .find_item(cart.cart_id, item_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let snapshot = self
            .lookup_inventory(item.product_id, item.variant_id)
            .await?;
        validate_stock(req.quantity, snapshot.available_stock)?;

        let item = self.command.set_item_quantity(item_id, req.quantity).await?;

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Cart item updated".to_string(),
            data: CartItemResponse::from(item),
        })
    }

    pub async fn delete_item(&self, cart: &Cart, item_id: Uuid) -> Result<(), ServiceError> {
        self.command.delete_item(cart.cart_id, item_id).await?;

        info!("🗑️ Removed item {} from cart {}", item_id, cart.cart_id);

        Ok(())
    }

    pub async fn merge_guest_cart(
        &self,
        user_cart: &Cart,
        guest_session_id: Option<&str>,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let guest_cart = match guest_session_id {
            Some(session_id) => self.query.find_by_session(session_id).await?,
            None => None,
        };

        let guest_cart = match guest_cart {
            // Merging into itself would delete the only cart the caller has.
            Some(cart) if cart.cart_id != user_cart.cart_id => cart,
            _ => return self.get_cart(user_cart).await,
        };

        // Validate every line against current stock before touching either
        // cart, so a rejected line leaves both carts unchanged.
        let mut plan = Vec::new();

        for guest_item in self.query.find_items(guest_cart.cart_id).await? {
            let existing = self
                .query
                .find_item_by_product(user_cart.cart_id, guest_item.product_id, guest_item.variant_id)
                .await?;

            let combined = guest_item.quantity
                + existing.as_ref().map(|item| item.quantity).unwrap_or(0);

            let snapshot = self
                .lookup_inventory(guest_item.product_id, guest_item.variant_id)
                .await?;
            validate_stock(combined, snapshot.available_stock).inspect_err(|_| {
                error!(
                    "❌ Merge of cart {} into {} rejected on product {}",
                    guest_cart.cart_id, user_cart.cart_id, guest_item.product_id
                );
            })?;

            plan.push(MergeLine {
                existing_item_id: existing.map(|item| item.cart_item_id),
                product_id: guest_item.product_id,
                variant_id: guest_item.variant_id,
                quantity: combined,
                unit_price_at_add: guest_item.unit_price_at_add,
            });
        }

        self.command
            .apply_merge(user_cart.cart_id, guest_cart.cart_id, &plan)
            .await?;

        info!(
            "🔄 Merged guest cart {} into user cart {}",
            guest_cart.cart_id, user_cart.cart_id
        );

        self.get_cart(user_cart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartItem, Product, ProductImage, ProductStatus, ProductVariant};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CartStore {
        carts: Vec<Cart>,
        items: Vec<CartItem>,
    }

    #[derive(Default)]
    struct FakeCartRepo {
        store: Mutex<CartStore>,
    }

    impl FakeCartRepo {
        fn seed_cart(&self, user_id: Option<Uuid>, session_id: Option<&str>) -> Cart {
            let cart = Cart {
                cart_id: Uuid::new_v4(),
                user_id,
                session_id: session_id.map(str::to_string),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.store.lock().unwrap().carts.push(cart.clone());
            cart
        }

        fn seed_item(
            &self,
            cart_id: Uuid,
            product_id: Uuid,
            variant_id: Option<Uuid>,
            quantity: i32,
            unit_price: Decimal,
        ) -> CartItem {
            let item = CartItem {
                cart_item_id: Uuid::new_v4(),
                cart_id,
                product_id,
                variant_id,
                quantity,
                unit_price_at_add: unit_price,
                created_at: Utc::now(),
            };
            self.store.lock().unwrap().items.push(item.clone());
            item
        }

        fn items_of(&self, cart_id: Uuid) -> Vec<CartItem> {
            self.store
                .lock()
                .unwrap()
                .items
                .iter()
                .filter(|item| item.cart_id == cart_id)
                .cloned()
                .collect()
        }

        fn cart_exists(&self, cart_id: Uuid) -> bool {
            self.store
                .lock()
                .unwrap()
                .carts
                .iter()
                .any(|cart| cart.cart_id == cart_id)
        }
    }

    #[async_trait]
    impl CartQueryRepositoryTrait for FakeCartRepo {
        async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
            Ok(self
                .store
                .lock()
                .unwrap()
                .carts
                .iter()
                .find(|cart| cart.user_id == Some(user_id))
                .cloned())
        }

        async fn find_by_session(&self, session_id: &str) -> Result<Option<Cart>, RepositoryError> {
            Ok(self
                .store
                .lock()
                .unwrap()
                .carts
                .iter()
                .find(|cart| cart.session_id.as_deref() == Some(session_id))
                .cloned())
        }

        async fn find_items(&self, cart_id: Uuid) -> Result<Vec<CartItem>, RepositoryError> {
            Ok(self.items_of(cart_id))
        }

        async fn find_item(
            &self,
            cart_id: Uuid,
            item_id: Uuid,
        ) -> Result<Option<CartItem>, RepositoryError> {
            Ok(self
                .store
                .lock()
                .unwrap()
                .items
                .iter()
                .find(|item| item.cart_id == cart_id && item.cart_item_id == item_id)
                .cloned())
        }

        async fn find_item_by_product(
            &self,
            cart_id: Uuid,
            product_id: Uuid,
            variant_id: Option<Uuid>,
        ) -> Result<Option<CartItem>, RepositoryError> {
            Ok(self
                .store
                .lock()
                .unwrap()
                .items
                .iter()
                .find(|item| {
                    item.cart_id == cart_id
                        && item.product_id == product_id
                        && item.variant_id == variant_id
                })
                .cloned())
        }
    }

    #[async_trait]
    impl CartCommandRepositoryTrait for FakeCartRepo {
        async fn create_cart(
            &self,
            user_id: Option<Uuid>,
            session_id: Option<&str>,
        ) -> Result<Cart, RepositoryError> {
            Ok(self.seed_cart(user_id, session_id))
        }

        async fn insert_item(
            &self,
            cart_id: Uuid,
            product_id: Uuid,
            variant_id: Option<Uuid>,
            quantity: i32,
            unit_price_at_add: Decimal,
        ) -> Result<CartItem, RepositoryError> {
            Ok(self.seed_item(cart_id, product_id, variant_id, quantity, unit_price_at_add))
        }

        async fn set_item_quantity(
            &self,
            item_id: Uuid,
            quantity: i32,
        ) -> Result<CartItem, RepositoryError> {
            let mut store = self.store.lock().unwrap();
            let item = store
                .items
                .iter_mut()
                .find(|item| item.cart_item_id == item_id)
                .ok_or(RepositoryError::NotFound)?;
            item.quantity = quantity;
            Ok(item.clone())
        }

        async fn delete_item(&self, cart_id: Uuid, item_id: Uuid) -> Result<(), RepositoryError> {
            let mut store = self.store.lock().unwrap();
            let before = store.items.len();
            store
                .items
                .retain(|item| !(item.cart_id == cart_id && item.cart_item_id == item_id));
            if store.items.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }

        async fn apply_merge(
            &self,
            target_cart_id: Uuid,
            guest_cart_id: Uuid,
            plan: &[MergeLine],
        ) -> Result<(), RepositoryError> {
            let mut store = self.store.lock().unwrap();
            for line in plan {
                match line.existing_item_id {
                    Some(item_id) => {
                        let item = store
                            .items
                            .iter_mut()
                            .find(|item| item.cart_item_id == item_id)
                            .ok_or(RepositoryError::NotFound)?;
                        item.quantity = line.quantity;
                    }
                    None => {
                        store.items.push(CartItem {
                            cart_item_id: Uuid::new_v4(),
                            cart_id: target_cart_id,
                            product_id: line.product_id,
                            variant_id: line.variant_id,
                            quantity: line.quantity,
                            unit_price_at_add: line.unit_price_at_add,
                            created_at: Utc::now(),
                        });
                    }
                }
            }
            store.items.retain(|item| item.cart_id != guest_cart_id);
            store.carts.retain(|cart| cart.cart_id != guest_cart_id);
            Ok(())
        }
    }

    use crate::abstract_trait::{
        CartCommandRepositoryTrait, CartQueryRepositoryTrait, ProductQueryRepositoryTrait,
    };

    #[derive(Default)]
    struct FakeProductRepo {
        products: Vec<Product>,
        variants: Vec<ProductVariant>,
    }

    impl FakeProductRepo {
        fn with_product(mut self, product_id: Uuid, price: &str, stock: i32) -> Self {
            self.products.push(Product {
                product_id,
                category_id: Uuid::new_v4(),
                sku: format!("SKU-{product_id}"),
                slug: format!("slug-{product_id}"),
                name: "Widget".to_string(),
                short_description: None,
                long_description: None,
                base_price: price.parse().unwrap(),
                currency: "USD".to_string(),
                is_active: true,
                is_featured: false,
                stock_quantity: stock,
                is_deleted: false,
                status: ProductStatus::Published,
                publish_at: Some(Utc::now()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
            self
        }

        fn delisted(mut self) -> Self {
            if let Some(product) = self.products.last_mut() {
                product.is_deleted = true;
            }
            self
        }

        fn with_variant(
            mut self,
            variant_id: Uuid,
            product_id: Uuid,
            delta: &str,
            stock: i32,
        ) -> Self {
            self.variants.push(ProductVariant {
                variant_id,
                product_id,
                name: "Large".to_string(),
                price_delta: delta.parse().unwrap(),
                stock_quantity: stock,
                created_at: Utc::now(),
            });
            self
        }
    }

    #[async_trait]
    impl ProductQueryRepositoryTrait for FakeProductRepo {
        async fn find_by_id(&self, product_id: Uuid) -> Result<Option<Product>, RepositoryError> {
            Ok(self
                .products
                .iter()
                .find(|p| p.product_id == product_id)
                .cloned())
        }

        async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
            Ok(self.products.iter().find(|p| p.slug == slug).cloned())
        }

        async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
            Ok(self.products.iter().find(|p| p.sku == sku).cloned())
        }

        async fn find_all_active(&self) -> Result<Vec<Product>, RepositoryError> {
            Ok(self.products.clone())
        }

        async fn find_images(
            &self,
            _product_id: Uuid,
        ) -> Result<Vec<ProductImage>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn find_variants(
            &self,
            product_id: Uuid,
        ) -> Result<Vec<ProductVariant>, RepositoryError> {
            Ok(self
                .variants
                .iter()
                .filter(|v| v.product_id == product_id)
                .cloned()
                .collect())
        }

        async fn find_variant(
            &self,
            variant_id: Uuid,
        ) -> Result<Option<ProductVariant>, RepositoryError> {
            Ok(self
                .variants
                .iter()
                .find(|v| v.variant_id == variant_id)
                .cloned())
        }
    }

    fn build_service(
        cart_repo: Arc<FakeCartRepo>,
        product_repo: FakeProductRepo,
    ) -> CartService {
        CartService::new(CartServiceDeps {
            query: cart_repo.clone(),
            command: cart_repo,
            product_query: Arc::new(product_repo),
        })
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn get_or_create_prefers_user_cart_over_session_cart() {
        let repo = Arc::new(FakeCartRepo::default());
        let user_id = Uuid::new_v4();
        let user_cart = repo.seed_cart(Some(user_id), None);
        repo.seed_cart(None, Some("sess-1"));
        let service = build_service(repo, FakeProductRepo::default());

        let cart = service
            .get_or_create(Some(user_id), Some("sess-1"))
            .await
            .unwrap();

        assert_eq!(cart.cart_id, user_cart.cart_id);
    }

    #[tokio::test]
    async fn get_or_create_binds_new_cart_to_single_identity() {
        let repo = Arc::new(FakeCartRepo::default());
        let user_id = Uuid::new_v4();
        let service = build_service(repo, FakeProductRepo::default());

        let cart = service
            .get_or_create(Some(user_id), Some("sess-1"))
            .await
            .unwrap();

        assert_eq!(cart.user_id, Some(user_id));
        assert_eq!(cart.session_id, None);
    }

    #[tokio::test]
    async fn add_item_locks_price_from_base_plus_variant_delta() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        let products = FakeProductRepo::default()
            .with_product(product_id, "10.00", 5)
            .with_variant(variant_id, product_id, "2.50", 3);
        let service = build_service(repo, products);

        let res = service
            .add_item(
                &cart,
                &AddCartItemRequest {
                    product_id,
                    variant_id: Some(variant_id),
                    quantity: 2,
                },
            )
            .await
            .unwrap();

        assert_eq!(res.data.unit_price_at_add, dec("12.50"));
        assert_eq!(res.data.quantity, 2);
    }

    #[tokio::test]
    async fn add_item_coalesces_same_product_and_keeps_locked_price() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        // Line was added at 8.00 before the price rose to 10.00.
        repo.seed_item(cart.cart_id, product_id, None, 2, dec("8.00"));
        let products = FakeProductRepo::default().with_product(product_id, "10.00", 10);
        let service = build_service(repo.clone(), products);

        let res = service
            .add_item(
                &cart,
                &AddCartItemRequest {
                    product_id,
                    variant_id: None,
                    quantity: 3,
                },
            )
            .await
            .unwrap();

        assert_eq!(res.data.quantity, 5);
        assert_eq!(res.data.unit_price_at_add, dec("8.00"));
        assert_eq!(repo.items_of(cart.cart_id).len(), 1);
    }

    #[tokio::test]
    async fn add_item_keeps_separate_lines_per_variant() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        repo.seed_item(cart.cart_id, product_id, None, 1, dec("10.00"));
        let products = FakeProductRepo::default()
            .with_product(product_id, "10.00", 5)
            .with_variant(variant_id, product_id, "1.00", 5);
        let service = build_service(repo.clone(), products);

        service
            .add_item(
                &cart,
                &AddCartItemRequest {
                    product_id,
                    variant_id: Some(variant_id),
                    quantity: 1,
                },
            )
            .await
            .unwrap();

        assert_eq!(repo.items_of(cart.cart_id).len(), 2);
    }

    #[tokio::test]
    async fn add_item_rejects_when_combined_quantity_exceeds_stock() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        repo.seed_item(cart.cart_id, product_id, None, 4, dec("10.00"));
        let products = FakeProductRepo::default().with_product(product_id, "10.00", 5);
        let service = build_service(repo.clone(), products);

        let err = service
            .add_item(
                &cart,
                &AddCartItemRequest {
                    product_id,
                    variant_id: None,
                    quantity: 2,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InsufficientStock {
                requested: 6,
                available: 5
            }
        ));
        // The existing line is untouched.
        assert_eq!(repo.items_of(cart.cart_id)[0].quantity, 4);
    }

    #[tokio::test]
    async fn add_item_rejects_soft_deleted_product() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        let products = FakeProductRepo::default()
            .with_product(product_id, "10.00", 5)
            .delisted();
        let service = build_service(repo, products);

        let err = service
            .add_item(
                &cart,
                &AddCartItemRequest {
                    product_id,
                    variant_id: None,
                    quantity: 1,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Repo(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn add_item_rejects_variant_of_another_product() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        let other_product_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        let products = FakeProductRepo::default()
            .with_product(product_id, "10.00", 5)
            .with_product(other_product_id, "20.00", 5)
            .with_variant(variant_id, other_product_id, "1.00", 5);
        let service = build_service(repo, products);

        let err = service
            .add_item(
                &cart,
                &AddCartItemRequest {
                    product_id,
                    variant_id: Some(variant_id),
                    quantity: 1,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidVariant));
    }

    #[tokio::test]
    async fn update_item_revalidates_against_current_stock() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        let item = repo.seed_item(cart.cart_id, product_id, None, 2, dec("10.00"));
        let products = FakeProductRepo::default().with_product(product_id, "10.00", 3);
        let service = build_service(repo, products);

        let err = service
            .update_item(&cart, item.cart_item_id, &UpdateCartItemRequest { quantity: 4 })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn update_item_unknown_id_is_not_found() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let service = build_service(repo, FakeProductRepo::default());

        let err = service
            .update_item(&cart, Uuid::new_v4(), &UpdateCartItemRequest { quantity: 1 })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Repo(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn delete_item_on_absent_id_is_not_found_and_repeatable() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        let kept = repo.seed_item(cart.cart_id, Uuid::new_v4(), None, 2, dec("5.00"));
        let service = build_service(repo.clone(), FakeProductRepo::default());
        let absent = Uuid::new_v4();

        for _ in 0..2 {
            let err = service.delete_item(&cart, absent).await.unwrap_err();
            assert!(matches!(err, ServiceError::Repo(RepositoryError::NotFound)));
        }

        // Existing lines are untouched by the failed deletes.
        let items = repo.items_of(cart.cart_id);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].cart_item_id, kept.cart_item_id);
    }

    #[tokio::test]
    async fn merge_combines_quantities_and_deletes_guest_cart() {
        let repo = Arc::new(FakeCartRepo::default());
        let user_id = Uuid::new_v4();
        let user_cart = repo.seed_cart(Some(user_id), None);
        let guest_cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        let other_product_id = Uuid::new_v4();
        repo.seed_item(user_cart.cart_id, product_id, None, 2, dec("9.00"));
        repo.seed_item(guest_cart.cart_id, product_id, None, 3, dec("10.00"));
        repo.seed_item(guest_cart.cart_id, other_product_id, None, 1, dec("4.00"));
        let products = FakeProductRepo::default()
            .with_product(product_id, "10.00", 10)
            .with_product(other_product_id, "4.00", 10);
        let service = build_service(repo.clone(), products);

        let res = service
            .merge_guest_cart(&user_cart, Some("sess-1"))
            .await
            .unwrap();

        let items = res.data.items;
        assert_eq!(items.len(), 2);
        let combined = items
            .iter()
            .find(|item| item.product_id == product_id)
            .unwrap();
        assert_eq!(combined.quantity, 5);
        // Combined line keeps the price locked by the user cart.
        assert_eq!(combined.unit_price_at_add, dec("9.00"));
        // New line carries the guest cart's locked price.
        let moved = items
            .iter()
            .find(|item| item.product_id == other_product_id)
            .unwrap();
        assert_eq!(moved.unit_price_at_add, dec("4.00"));
        assert!(!repo.cart_exists(guest_cart.cart_id));
    }

    #[tokio::test]
    async fn merge_without_guest_session_is_a_noop() {
        let repo = Arc::new(FakeCartRepo::default());
        let user_cart = repo.seed_cart(Some(Uuid::new_v4()), None);
        let product_id = Uuid::new_v4();
        repo.seed_item(user_cart.cart_id, product_id, None, 2, dec("9.00"));
        let service = build_service(repo, FakeProductRepo::default());

        let res = service.merge_guest_cart(&user_cart, None).await.unwrap();

        assert_eq!(res.data.items.len(), 1);
    }

    #[tokio::test]
    async fn merge_into_same_cart_is_a_noop() {
        let repo = Arc::new(FakeCartRepo::default());
        let cart = repo.seed_cart(None, Some("sess-1"));
        repo.seed_item(cart.cart_id, Uuid::new_v4(), None, 1, dec("5.00"));
        let service = build_service(repo.clone(), FakeProductRepo::default());

        let res = service.merge_guest_cart(&cart, Some("sess-1")).await.unwrap();

        assert!(repo.cart_exists(cart.cart_id));
        assert_eq!(res.data.items.len(), 1);
    }

    #[tokio::test]
    async fn merge_stock_failure_leaves_both_carts_unchanged() {
        let repo = Arc::new(FakeCartRepo::default());
        let user_cart = repo.seed_cart(Some(Uuid::new_v4()), None);
        let guest_cart = repo.seed_cart(None, Some("sess-1"));
        let product_id = Uuid::new_v4();
        repo.seed_item(user_cart.cart_id, product_id, None, 3, dec("10.00"));
        repo.seed_item(guest_cart.cart_id, product_id, None, 3, dec("10.00"));
        let products = FakeProductRepo::default().with_product(product_id, "10.00", 4);
        let service = build_service(repo.clone(), products);

        let err = service
            .merge_guest_cart(&user_cart, Some("sess-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InsufficientStock { .. }));
        assert!(repo.cart_exists(guest_cart.cart_id));
        assert_eq!(repo.items_of(user_cart.cart_id)[0].quantity, 3);
        assert_eq!(repo.items_of(guest_cart.cart_id)[0].quantity, 3);
    }
}
