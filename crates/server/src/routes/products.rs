use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    Json,
};
use common::types::Ack;
use models::{DeleteProductRequest, NewProduct, Product, UpdateProductRequest};
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[utoipa::path(
    get, path = "/api/products", tag = "catalog",
    responses((status = 200, description = "Full catalog snapshot", body = [crate::openapi::ProductDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Product>> {
    let products = state.catalog.list().await;
    info!(count = products.len(), "list products");
    Json(products)
}

#[utoipa::path(
    post, path = "/api/products", tag = "catalog",
    request_body = crate::openapi::NewProductDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Missing name, price or category"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let Json(input) = payload?;
    let created = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/products", tag = "catalog",
    request_body = crate::openapi::UpdateRequestDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDoc),
        (status = 400, description = "Missing id or updates"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let Json(request) = payload?;
    Ok(Json(state.catalog.update(request).await?))
}

#[utoipa::path(
    delete, path = "/api/products", tag = "catalog",
    request_body = crate::openapi::DeleteRequestDoc,
    responses(
        (status = 200, description = "Deleted (or already absent)"),
        (status = 400, description = "Missing id")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<DeleteProductRequest>, JsonRejection>,
) -> Result<Json<Ack>, JsonApiError> {
    let Json(request) = payload?;
    state.catalog.delete(request).await?;
    Ok(Json(Ack::ok()))
}

pub async fn method_not_allowed(method: Method) -> JsonApiError {
    JsonApiError::method_not_allowed(method.as_str())
}
