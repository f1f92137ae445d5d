use axum::extract::State;

use crate::{
    api::{
        dto::products::{ProductRequest, ProductResponse},
        envelope::ApiResponse,
        extractors::{JsonBody, ProductId},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ProductResponse>>, AppError> {
    let rows = state.products.list().await?;
    Ok(ApiResponse::ok(
        rows.into_iter().map(ProductResponse::from).collect(),
    ))
}

pub async fn get_product(
    State(state): State<AppState>,
    product_id: ProductId,
) -> Result<ApiResponse<ProductResponse>, AppError> {
    let product = state
        .products
        .get(product_id.id)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(ApiResponse::ok(product.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<ApiResponse<ProductResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let product = state.products.create(req.into()).await?;
    tracing::info!(product_id = product.id, "product created");

    Ok(ApiResponse::created(product.into()))
}

// Existing cart rows keep the price they were written with.
pub async fn update_product(
    State(state): State<AppState>,
    product_id: ProductId,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<ApiResponse<ProductResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let product = state
        .products
        .update(product_id.id, req.into())
        .await?
        .ok_or(AppError::not_found("product"))?;
    tracing::info!(product_id = product.id, "product updated");

    Ok(ApiResponse::ok(product.into()))
}

// Cart rows already holding the product are left as they are.
pub async fn delete_product(
    State(state): State<AppState>,
    product_id: ProductId,
) -> Result<ApiResponse<()>, AppError> {
    if !state.products.delete(product_id.id).await? {
        return Err(AppError::not_found("product"));
    }
    tracing::info!(product_id = product_id.id, "product deleted");

    Ok(ApiResponse::ok(()).with_message("product deleted"))
}
