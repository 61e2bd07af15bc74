use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    abstract_trait::{DynCartQueryRepository, DynPaymentGateway},
    domain::responses::{ApiResponse, PaymentIntentResponse, WebhookAckResponse},
    errors::ServiceError,
};
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct PaymentService {
    cart_query: DynCartQueryRepository,
    gateway: DynPaymentGateway,
    currency: String,
}

impl PaymentService {
    pub fn new(cart_query: DynCartQueryRepository, gateway: DynPaymentGateway, currency: String) -> Self {
        Self {
            cart_query,
            gateway,
            currency,
        }
    }

    /// Opens a payment intent for the user's current cart total. The intent
    /// carries the cart and user ids so the webhook can correlate the result.
    pub async fn create_intent_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<ApiResponse<PaymentIntentResponse>, ServiceError> {
        let cart = self
            .cart_query
            .find_by_user(user_id)
            .await?
            .ok_or(ServiceError::EmptyCart)?;

        let items = self.cart_query.find_items(cart.cart_id).await?;
        if items.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let total: Decimal = items
            .iter()
            .map(|item| item.unit_price_at_add * Decimal::from(item.quantity))
            .sum();

        let metadata = [
            ("cart_id", cart.cart_id.to_string()),
            ("user_id", user_id.to_string()),
        ];

        let client_secret = self
            .gateway
            .create_intent(total, &self.currency, &metadata)
            .await?;

        info!(
            "✅ Payment intent opened for cart {} ({} {})",
            cart.cart_id, total, self.currency
        );

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Payment intent created".to_string(),
            data: PaymentIntentResponse { client_secret },
        })
    }

    pub fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<ApiResponse<WebhookAckResponse>, ServiceError> {
        let signature_header = signature_header.ok_or(ServiceError::InvalidSignature)?;
        let event = self.gateway.verify_webhook(payload, signature_header)?;

        match event.event_type.as_str() {
            "payment_intent.succeeded" => {
                info!("✅ Payment succeeded: {}", describe(&event.payload));
            }
            "payment_intent.payment_failed" => {
                warn!("❌ Payment failed: {}", describe(&event.payload));
            }
            other => {
                info!("Ignoring webhook event '{other}'");
            }
        }

        Ok(ApiResponse {
            status: "success".to_string(),
            message: "Webhook processed".to_string(),
            data: WebhookAckResponse {
                received: true,
                event_type: event.event_type,
            },
        })
    }
}

fn describe(payload: &serde_json::Value) -> String {
    payload
        .pointer("/data/object/id")
        .and_then(|id| id.as_str())
        .unwrap_or("<no intent id>")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{CartQueryRepositoryTrait, PaymentGatewayTrait, WebhookEvent},
        errors::RepositoryError,
        model::{Cart, CartItem},
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    struct FakeCartRepo {
        cart: Option<Cart>,
        items: Vec<CartItem>,
    }

    #[async_trait]
    impl CartQueryRepositoryTrait for FakeCartRepo {
        async fn find_by_user(&self, _user_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
            Ok(self.cart.clone())
        }

        async fn find_by_session(
            &self,
            _session_id: &str,
        ) -> Result<Option<Cart>, RepositoryError> {
            Ok(None)
        }

        async fn find_items(&self, _cart_id: Uuid) -> Result<Vec<CartItem>, RepositoryError> {
            Ok(self.items.clone())
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
    struct FakeGateway {
        calls: Mutex<Vec<(Decimal, String, Vec<(String, String)>)>>,
    }

    #[async_trait]
    impl PaymentGatewayTrait for FakeGateway {
        async fn create_intent(
            &self,
            amount: Decimal,
            currency: &str,
            metadata: &[(&str, String)],
        ) -> Result<String, ServiceError> {
            self.calls.lock().unwrap().push((
                amount,
                currency.to_string(),
                metadata
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ));
            Ok("pi_secret_123".to_string())
        }

        fn verify_webhook(
            &self,
            payload: &[u8],
            _signature_header: &str,
        ) -> Result<WebhookEvent, ServiceError> {
            let payload: serde_json::Value = serde_json::from_slice(payload).unwrap();
            Ok(WebhookEvent {
                event_type: payload["type"].as_str().unwrap_or("unknown").to_string(),
                payload,
            })
        }
    }

    fn cart_with_items(user_id: Uuid, prices: &[(&str, i32)]) -> FakeCartRepo {
        let cart_id = Uuid::new_v4();
        FakeCartRepo {
            cart: Some(Cart {
                cart_id,
                user_id: Some(user_id),
                session_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
            items: prices
                .iter()
                .map(|(price, quantity)| CartItem {
                    cart_item_id: Uuid::new_v4(),
                    cart_id,
                    product_id: Uuid::new_v4(),
                    variant_id: None,
                    quantity: *quantity,
                    unit_price_at_add: price.parse().unwrap(),
                    created_at: Utc::now(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn intent_carries_cart_total_and_metadata() {
        let user_id = Uuid::new_v4();
        let repo = cart_with_items(user_id, &[("10.50", 2), ("5.00", 1)]);
        let gateway = Arc::new(FakeGateway::default());
        let service = PaymentService::new(Arc::new(repo), gateway.clone(), "USD".to_string());

        let res = service.create_intent_for_user(user_id).await.unwrap();

        assert_eq!(res.data.client_secret, "pi_secret_123");
        let calls = gateway.calls.lock().unwrap();
        let (amount, currency, metadata) = &calls[0];
        assert_eq!(*amount, "26.00".parse::<Decimal>().unwrap());
        assert_eq!(currency, "USD");
        assert!(metadata.iter().any(|(k, _)| k == "cart_id"));
        assert!(metadata.iter().any(|(k, v)| k == "user_id" && *v == user_id.to_string()));
    }

    #[tokio::test]
    async fn empty_cart_cannot_open_an_intent() {
        let user_id = Uuid::new_v4();
        let repo = cart_with_items(user_id, &[]);
        let service = PaymentService::new(
            Arc::new(repo),
            Arc::new(FakeGateway::default()),
            "USD".to_string(),
        );

        let err = service.create_intent_for_user(user_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::EmptyCart));
    }

    #[tokio::test]
    async fn webhook_without_signature_is_rejected() {
        let repo = cart_with_items(Uuid::new_v4(), &[]);
        let service = PaymentService::new(
            Arc::new(repo),
            Arc::new(FakeGateway::default()),
            "USD".to_string(),
        );

        let err = service.handle_webhook(b"{}", None).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidSignature));
    }

    #[tokio::test]
    async fn webhook_acks_with_event_type() {
        let repo = cart_with_items(Uuid::new_v4(), &[]);
        let service = PaymentService::new(
            Arc::new(repo),
            Arc::new(FakeGateway::default()),
            "USD".to_string(),
        );

        let res = service
            .handle_webhook(br#"{"type":"payment_intent.succeeded"}"#, Some("t=0,v1=ff"))
            .unwrap();

        assert!(res.data.received);
        assert_eq!(res.data.event_type, "payment_intent.succeeded");
    }
}
