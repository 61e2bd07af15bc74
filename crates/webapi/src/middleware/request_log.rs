use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags every request with an id (honoring one supplied by a proxy) and logs
/// method, path, status and latency.
pub async fn request_log(mut req: Request<Body>, next: Next) -> impl IntoResponse {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    req.extensions_mut().insert(request_id.clone());

    let started = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = started.elapsed();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        "{} {} -> {} ({} ms) [{}]",
        method,
        path,
        response.status().as_u16(),
        elapsed.as_millis(),
        request_id
    );

    response
}
