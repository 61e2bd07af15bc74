use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use shared::errors::ErrorResponse;
use tracing::warn;

use crate::limiter::{DynRateLimiter, RateDecision};

pub async fn rate_limit(
    Extension(rate_limiter): Extension<DynRateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let client_ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let RateDecision::Limited { retry_after_secs } = rate_limiter.check(&client_ip) {
        warn!(
            "Rate limit exceeded for IP: {} (retry in {}s)",
            client_ip, retry_after_secs
        );
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::fail("Too many requests, please try again later")),
        ));
    }

    Ok(next.run(req).await)
}
