use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use shared::errors::ErrorResponse;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::warn;

/// Bounds in-flight requests. Health probes bypass the gate so the service
/// still reports liveness while saturated.
pub async fn backpressure(
    Extension(semaphore): Extension<Arc<Semaphore>>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    if req.uri().path() == "/api/healthz" {
        return Ok(next.run(req).await);
    }

    let Ok(_permit) = semaphore.try_acquire() else {
        warn!("Request shed, {} permits in use", semaphore.available_permits());
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::fail("Server is busy, please retry shortly")),
        ));
    };

    Ok(next.run(req).await)
}
