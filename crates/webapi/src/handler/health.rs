use axum::{Json, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub fn health_routes() -> OpenApiRouter {
    OpenApiRouter::new().route("/api/healthz", get(healthz))
}
