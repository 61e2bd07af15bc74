mod cart;
mod category;
mod health;
mod order;
mod payment;
mod product;

use crate::{
    limiter::{DynRateLimiter, SlidingWindowRateLimiter},
    middleware::{
        backpressure::backpressure, rate_limit::rate_limit, request_log::request_log,
        security::security_headers,
    },
};
use anyhow::Result;
use axum::{Extension, extract::DefaultBodyLimit, middleware};
use shared::{state::AppState, utils::shutdown_signal};
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::Semaphore};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::cart::cart_routes;
pub use self::category::category_routes;
pub use self::health::health_routes;
pub use self::order::order_routes;
pub use self::payment::payment_routes;
pub use self::product::product_routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,

        category::get_categories,
        category::get_category,
        category::create_category,
        category::update_category,

        product::get_products,
        product::get_product,
        product::create_product,
        product::bulk_update_products,
        product::update_product,
        product::delete_product,
        product::add_product_image,
        product::upload_product_image,
        product::delete_product_image,

        cart::get_cart,
        cart::add_cart_item,
        cart::update_cart_item,
        cart::delete_cart_item,
        cart::merge_cart,

        order::checkout,
        order::get_orders,
        order::get_order,

        payment::create_payment_intent,
        payment::stripe_webhook,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probes"),
        (name = "Category", description = "Category catalog endpoints"),
        (name = "Product", description = "Product catalog endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Order", description = "Checkout and order endpoints"),
        (name = "Payment", description = "Payment intent and webhook endpoints"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                )),
            );
        }
    }
}

pub struct AppRouter;

impl AppRouter {
    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let shared_state = Arc::new(app_state);

        let semaphore = Arc::new(Semaphore::new(
            shared_state.config.max_concurrent_requests,
        ));
        let limiter: DynRateLimiter = Arc::new(SlidingWindowRateLimiter::new(
            shared_state.config.rate_limit_per_minute,
            Duration::from_secs(60),
        ));
        let body_limit = shared_state.config.storage.max_upload_bytes;

        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .merge(health_routes())
            .merge(category_routes(shared_state.clone()))
            .merge(product_routes(shared_state.clone()))
            .merge(cart_routes(shared_state.clone()))
            .merge(order_routes(shared_state.clone()))
            .merge(payment_routes(shared_state.clone()));

        let router_with_layers = api_router
            .layer(middleware::from_fn(backpressure))
            .layer(Extension(semaphore))
            .layer(middleware::from_fn(rate_limit))
            .layer(Extension(limiter))
            .layer(middleware::from_fn(security_headers))
            .layer(middleware::from_fn(request_log))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(body_limit.max(1024 * 1024)));

        let (app_router, api) = router_with_layers.split_for_parts();

        let app = app_router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()));

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        println!("🚀 Server running on http://{}", listener.local_addr()?);
        println!("📚 API Documentation available at:");
        println!("   📖 Swagger UI: http://localhost:{port}/swagger-ui");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
