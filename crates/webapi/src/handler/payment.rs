use crate::middleware::jwt::auth_middleware;
use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::post,
};
use shared::{
    domain::responses::{ApiResponse, PaymentIntentResponse, WebhookAckResponse},
    errors::HttpError,
    service::PaymentService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/payments/intent",
    tag = "Payment",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Payment intent for the current cart total", body = ApiResponse<PaymentIntentResponse>),
        (status = 400, description = "Empty cart"),
        (status = 502, description = "Payment provider unavailable"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_payment_intent(
    Extension(service): Extension<PaymentService>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_intent_for_user(user_id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/webhooks/stripe",
    tag = "Payment",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Webhook verified and acknowledged", body = ApiResponse<WebhookAckResponse>),
        (status = 400, description = "Missing or invalid signature")
    )
)]
pub async fn stripe_webhook(
    Extension(service): Extension<PaymentService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());

    let response = service.handle_webhook(&body, signature)?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let protected = OpenApiRouter::new()
        .route("/api/payments/intent", post(create_payment_intent))
        .route_layer(middleware::from_fn(auth_middleware));

    OpenApiRouter::new()
        .route("/api/webhooks/stripe", post(stripe_webhook))
        .merge(protected)
        .layer(Extension(app_state.di_container.payment_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
