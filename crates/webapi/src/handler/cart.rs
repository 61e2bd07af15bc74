use crate::middleware::{
    jwt::{RequestIdentity, identity_middleware},
    validate::SimpleValidatedJson,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use shared::{
    domain::{
        requests::{AddCartItemRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartItemResponse, CartResponse},
    },
    errors::HttpError,
    service::CartService,
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart, created on first access", body = ApiResponse<CartResponse>),
        (status = 401, description = "No user token or session header")
    )
)]
pub async fn get_cart(
    Extension(service): Extension<CartService>,
    Extension(identity): Extension<RequestIdentity>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service
        .get_or_create(identity.user_id, identity.session_id.as_deref())
        .await?;
    let response = service.get_cart(&cart).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Item added, quantities coalesced per product and variant", body = ApiResponse<CartItemResponse>),
        (status = 400, description = "Insufficient stock or invalid variant"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "No user token or session header")
    )
)]
pub async fn add_cart_item(
    Extension(service): Extension<CartService>,
    Extension(identity): Extension<RequestIdentity>,
    SimpleValidatedJson(body): SimpleValidatedJson<AddCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service
        .get_or_create(identity.user_id, identity.session_id.as_deref())
        .await?;
    let response = service.add_item(&cart, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/cart/items/{item_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("item_id" = Uuid, Path, description = "Cart item id")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartItemResponse>),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Item not in this cart"),
        (status = 401, description = "No user token or session header")
    )
)]
pub async fn update_cart_item(
    Extension(service): Extension<CartService>,
    Extension(identity): Extension<RequestIdentity>,
    Path(item_id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service
        .get_or_create(identity.user_id, identity.session_id.as_deref())
        .await?;
    let response = service.update_item(&cart, item_id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{item_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("item_id" = Uuid, Path, description = "Cart item id")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "Item not in this cart"),
        (status = 401, description = "No user token or session header")
    )
)]
pub async fn delete_cart_item(
    Extension(service): Extension<CartService>,
    Extension(identity): Extension<RequestIdentity>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let cart = service
        .get_or_create(identity.user_id, identity.session_id.as_deref())
        .await?;
    service.delete_item(&cart, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/cart/merge",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Guest cart merged into the user cart", body = ApiResponse<CartResponse>),
        (status = 400, description = "Merged quantities exceed current stock"),
        (status = 401, description = "Login required")
    )
)]
pub async fn merge_cart(
    Extension(service): Extension<CartService>,
    Extension(identity): Extension<RequestIdentity>,
) -> Result<impl IntoResponse, HttpError> {
    let user_id = identity
        .user_id
        .ok_or_else(|| HttpError::Unauthorized("Login required to merge carts".into()))?;

    let user_cart = service.get_or_create(Some(user_id), None).await?;
    let response = service
        .merge_guest_cart(&user_cart, identity.session_id.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

pub fn cart_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/cart", get(get_cart))
        .route("/api/cart/items", post(add_cart_item))
        .route("/api/cart/items/{item_id}", put(update_cart_item))
        .route("/api/cart/items/{item_id}", delete(delete_cart_item))
        .route("/api/cart/merge", post(merge_cart))
        .route_layer(middleware::from_fn(identity_middleware))
        .layer(Extension(app_state.di_container.cart_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
