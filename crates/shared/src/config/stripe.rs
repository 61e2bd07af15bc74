use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sha2::Sha256;
use tracing::{error, info};

use crate::{
    abstract_trait::{PaymentGatewayTrait, WebhookEvent},
    config::StripeConfig,
    errors::ServiceError,
};

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Maximum age of a webhook signature before it is treated as a replay.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Clone)]
pub struct StripeGateway {
    secret_key: Option<String>,
    webhook_secret: Option<String>,
    http: Client,
}

impl StripeGateway {
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            secret_key: config.secret_key.clone(),
            webhook_secret: config.webhook_secret.clone(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGatewayTrait for StripeGateway {
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        metadata: &[(&str, String)],
    ) -> Result<String, ServiceError> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or_else(|| ServiceError::Gateway("Stripe is not configured".to_string()))?;

        let amount_minor = to_minor_units(amount)?;

        let mut params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount_minor.to_string()),
            ("currency".to_string(), currency.to_lowercase()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        for (key, value) in metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }

        let response = self
            .http
            .post(format!("{STRIPE_API_BASE}/payment_intents"))
            .bearer_auth(secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|err| {
                error!("❌ Stripe request failed: {err}");
                ServiceError::Gateway(format!("Stripe request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("❌ Stripe returned {status}: {body}");
            return Err(ServiceError::Gateway(format!("Stripe returned {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| ServiceError::Gateway(format!("Invalid Stripe response: {err}")))?;

        let client_secret = body
            .get("client_secret")
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                ServiceError::Gateway("Stripe response missing client_secret".to_string())
            })?;

        info!("✅ Created payment intent ({amount_minor} minor units)");

        Ok(client_secret.to_string())
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, ServiceError> {
        let webhook_secret = self
            .webhook_secret
            .as_deref()
            .ok_or_else(|| ServiceError::Gateway("Stripe webhooks not configured".to_string()))?;

        verify_signature(
            payload,
            signature_header,
            webhook_secret,
            Utc::now().timestamp(),
        )?;

        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|_| ServiceError::Gateway("Malformed webhook payload".to_string()))?;

        let event_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(WebhookEvent {
            event_type,
            payload: value,
        })
    }
}

/// Converts a major-unit amount (e.g. 12.34 USD) into the minor units Stripe
/// expects (1234 cents).
fn to_minor_units(amount: Decimal) -> Result<i64, ServiceError> {
    (amount * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| ServiceError::Gateway("Amount out of range".to_string()))
}

/// Checks a `Stripe-Signature` header (`t=<unix>,v1=<hex hmac>`) against the
/// HMAC-SHA256 of `"{t}.{payload}"`.
fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), ServiceError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(ServiceError::InvalidSignature)?;
    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(ServiceError::InvalidSignature);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| ServiceError::Internal(format!("HMAC init failed: {err}")))?;
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);

    for signature in signatures {
        if let Some(bytes) = decode_hex(signature) {
            if mac.clone().verify_slice(&bytes).is_ok() {
                return Ok(());
            }
        }
    }

    Err(ServiceError::InvalidSignature)
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }

    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        let digest = mac.finalize().into_bytes();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        format!("t={timestamp},v1={hex}")
    }

    #[test]
    fn valid_signature_passes() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);

        assert!(verify_signature(payload, &header, "whsec_test", 1_700_000_000).is_ok());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let payload = br#"{"type":"payment_intent.succeeded"}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);

        let err = verify_signature(b"{}", &header, "whsec_test", 1_700_000_000).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidSignature));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let payload = br#"{}"#;
        let header = sign(payload, "whsec_other", 1_700_000_000);

        assert!(verify_signature(payload, &header, "whsec_test", 1_700_000_000).is_err());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let payload = br#"{}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);

        let err = verify_signature(
            payload,
            &header,
            "whsec_test",
            1_700_000_000 + SIGNATURE_TOLERANCE_SECS + 1,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidSignature));
    }

    #[test]
    fn header_without_v1_is_rejected() {
        assert!(verify_signature(b"{}", "t=1700000000", "whsec_test", 1_700_000_000).is_err());
    }

    #[test]
    fn minor_unit_conversion_rounds_to_cents() {
        assert_eq!(to_minor_units("12.34".parse().unwrap()).unwrap(), 1234);
        assert_eq!(to_minor_units("0.999".parse().unwrap()).unwrap(), 100);
        assert_eq!(to_minor_units("10".parse().unwrap()).unwrap(), 1000);
    }
}
