use crate::middleware::{jwt::auth_middleware, validate::SimpleValidatedJson};
use axum::{
    Json,
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use shared::{
    domain::{
        requests::{
            BulkProductUpdateRequest, CreateProductImageRequest, CreateProductRequest,
            UpdateProductRequest,
        },
        responses::{ApiResponse, ProductImageResponse, ProductResponse},
    },
    errors::HttpError,
    service::{ProductService, StorageService, StoredFile},
    state::AppState,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Product",
    responses(
        (status = 200, description = "List of published products", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_products(
    Extension(service): Extension<ProductService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    tag = "Product",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(service): Extension<ProductService>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_slug(&slug).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 409, description = "Slug or SKU already in use"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_product(
    Extension(service): Extension<ProductService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/bulk",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = BulkProductUpdateRequest,
    responses(
        (status = 200, description = "Products updated", body = ApiResponse<Vec<ProductResponse>>),
        (status = 404, description = "A referenced product does not exist"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn bulk_update_products(
    Extension(service): Extension<ProductService>,
    SimpleValidatedJson(body): SimpleValidatedJson<BulkProductUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.bulk_update(&body.items).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_product(
    Extension(service): Extension<ProductService>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product soft-deleted"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_product(
    Extension(service): Extension<ProductService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/images",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = CreateProductImageRequest,
    responses(
        (status = 201, description = "Image attached", body = ApiResponse<ProductImageResponse>),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_product_image(
    Extension(service): Extension<ProductService>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateProductImageRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.add_image(id, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/images/upload",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 201, description = "Image uploaded and attached", body = ApiResponse<ProductImageResponse>),
        (status = 400, description = "Missing file or unsupported content type"),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn upload_product_image(
    Extension(service): Extension<ProductService>,
    Extension(storage): Extension<StorageService>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut stored: Option<StoredFile> = None;
    let mut alt_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| HttpError::BadRequest(format!("Invalid multipart payload: {err}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| HttpError::BadRequest(format!("Failed to read file: {err}")))?;

                stored = Some(
                    storage
                        .save_upload(&filename, content_type.as_deref(), &data)
                        .await?,
                );
            }
            Some("alt_text") => {
                alt_text = field.text().await.ok();
            }
            _ => {}
        }
    }

    let stored = stored.ok_or_else(|| HttpError::BadRequest("Missing 'file' field".into()))?;

    let response = service
        .add_image(
            id,
            &CreateProductImageRequest {
                url: stored.stored_name,
                alt_text,
                sort_order: 0,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}/images/{image_id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product id"),
        ("image_id" = Uuid, Path, description = "Image id")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_product_image(
    Extension(service): Extension<ProductService>,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, HttpError> {
    service.delete_image(id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let admin = OpenApiRouter::new()
        .route("/api/admin/products", post(create_product))
        .route("/api/admin/products/bulk", put(bulk_update_products))
        .route("/api/admin/products/{id}", put(update_product))
        .route("/api/admin/products/{id}", delete(delete_product))
        .route("/api/admin/products/{id}/images", post(add_product_image))
        .route(
            "/api/admin/products/{id}/images/upload",
            post(upload_product_image),
        )
        .route(
            "/api/admin/products/{id}/images/{image_id}",
            delete(delete_product_image),
        )
        .route_layer(middleware::from_fn(auth_middleware));

    OpenApiRouter::new()
        .route("/api/products", get(get_products))
        .route("/api/products/{slug}", get(get_product))
        .merge(admin)
        .layer(Extension(app_state.di_container.product_service.clone()))
        .layer(Extension(app_state.di_container.storage_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
