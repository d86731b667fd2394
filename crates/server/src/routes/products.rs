use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    Json,
};
use tracing::{error, info};

use models::errors::ValidationErrors;
use service::product::Product;

use crate::{errors::JsonApiError, state::ServerState};

const BASE_PATH: &str = "/api/products";

/// Malformed or mistyped JSON bodies are caller errors, reported like field validation.
fn body_rejection(rejection: JsonRejection) -> JsonApiError {
    JsonApiError::validation(ValidationErrors::single("body", rejection.body_text()))
}

#[utoipa::path(
    get, path = "/api/products", tag = "products",
    responses(
        (status = 200, description = "All products", body = [crate::openapi::ProductDoc]),
        (status = 500, description = "Storage fault", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Product>>, JsonApiError> {
    let items = state.products.list().await?;
    info!(count = items.len(), "list products");
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ProductDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Storage fault", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<Product>, JsonApiError> {
    Ok(Json(state.products.get(id).await?))
}

#[utoipa::path(
    post, path = "/api/products", tag = "products",
    request_body = crate::openapi::ProductDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ApiErrorDoc),
        (status = 500, description = "Create Failed", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Product>), JsonApiError> {
    let Json(input) = payload.map_err(body_rejection)?;
    info!(name = %input.name, stock = input.stock_available, "product_create_request");
    match state.products.create(input).await {
        Ok(created) => {
            let location = format!("{BASE_PATH}/{}", created.id);
            info!(id = created.id, %location, "created product");
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
        }
        Err(e) => {
            if !e.is_client_error() { error!(err = %e, "create product failed"); }
            Err(e.into())
        }
    }
}

#[utoipa::path(
    put, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::ProductDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Id mismatch or Validation Error", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed or Concurrency Conflict", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Json(input) = payload.map_err(body_rejection)?;
    match state.products.update(id, input).await {
        Ok(()) => { info!(id, "updated product"); Ok(StatusCode::NO_CONTENT) }
        Err(e) => {
            if !e.is_client_error() { error!(id, err = %e, "update product failed"); }
            Err(e.into())
        }
    }
}

#[utoipa::path(
    delete, path = "/api/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<StatusCode, JsonApiError> {
    state.products.delete(id).await?;
    info!(id, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put, path = "/api/products/decrement-stock/{id}/{quantity}", tag = "products",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("quantity" = i32, Path, description = "Units to take out of stock")
    ),
    responses(
        (status = 200, description = "Stock decremented"),
        (status = 400, description = "Insufficient stock", body = crate::openapi::ApiErrorDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn decrement_stock(
    State(state): State<ServerState>,
    Path((id, quantity)): Path<(i32, i32)>,
) -> Result<StatusCode, JsonApiError> {
    state.products.decrement_stock(id, quantity).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    put, path = "/api/products/add-to-stock/{id}/{quantity}", tag = "products",
    params(
        ("id" = i32, Path, description = "Product ID"),
        ("quantity" = i32, Path, description = "Units to put back into stock")
    ),
    responses(
        (status = 200, description = "Stock increased"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed", body = crate::openapi::ApiErrorDoc)
    )
)]
pub async fn add_to_stock(
    State(state): State<ServerState>,
    Path((id, quantity)): Path<(i32, i32)>,
) -> Result<StatusCode, JsonApiError> {
    state.products.add_to_stock(id, quantity).await?;
    Ok(StatusCode::OK)
}
