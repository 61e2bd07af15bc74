use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct WebhookAckResponse {
    pub received: bool,
    pub event_type: String,
}
