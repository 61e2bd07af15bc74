use crate::errors::ServiceError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;

/// A verified event delivered by the payment provider's webhook.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub event_type: String,
    pub payload: serde_json::Value,
}

/// Call contract of the external payment processor. Checkout never depends on
/// this succeeding; order creation and payment authorization are separate
/// calls with no compensating transaction.
#[async_trait]
pub trait PaymentGatewayTrait {
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: &[(&str, String)],
    ) -> Result<String, ServiceError>;

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, ServiceError>;
}
