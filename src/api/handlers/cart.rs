/*
 * Responsibility
 * - /cart 系 handler
 * - DTO validation → CartService 呼び出し → envelope
 * - 認証 / 所有者チェックは middleware 側 (routes.rs で route_layer)
 */
use axum::{Extension, extract::State};

use crate::{
    api::{
        dto::cart::{
            BulkDeleteRequest, CartItemRequest, CartItemResponse, CartTotalResponse,
            DeletedCountResponse,
        },
        envelope::ApiResponse,
        extractors::{AuthCtxExtractor, CartItemId, JsonBody},
    },
    error::AppError,
    middleware::auth::{OwnedCartItem, ensure_owns_all},
    repos::cart_repo::CartItem,
    services::cart::{CartItemInput, MAX_BATCH_SIZE},
    state::AppState,
};

fn responses(items: Vec<CartItem>) -> Vec<CartItemResponse> {
    items.into_iter().map(CartItemResponse::from).collect()
}

pub async fn list_cart(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<ApiResponse<Vec<CartItemResponse>>, AppError> {
    let items = state.carts.get_by_user(ctx.user_id).await?;
    Ok(ApiResponse::ok(responses(items)))
}

pub async fn create_cart_item(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonBody(req): JsonBody<CartItemRequest>,
) -> Result<ApiResponse<CartItemResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let item = state.carts.create(ctx.user_id, req.into()).await?;
    Ok(ApiResponse::created(item.into()).with_message("cart item saved"))
}

pub async fn create_cart_items(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonBody(reqs): JsonBody<Vec<CartItemRequest>>,
) -> Result<ApiResponse<Vec<CartItemResponse>>, AppError> {
    if reqs.is_empty() {
        return Err(AppError::bad_request("at least one item is required"));
    }
    if reqs.len() > MAX_BATCH_SIZE {
        return Err(AppError::bad_request(format!(
            "at most {MAX_BATCH_SIZE} items are allowed per request"
        )));
    }
    for (index, req) in reqs.iter().enumerate() {
        req.validate()
            .map_err(|msg| AppError::bad_request(format!("item {}: {msg}", index + 1)))?;
    }

    let inputs: Vec<CartItemInput> = reqs.into_iter().map(Into::into).collect();
    let items = state.carts.create_many(ctx.user_id, inputs).await?;
    Ok(ApiResponse::created(responses(items)))
}

// Row already loaded by the ownership check.
pub async fn get_cart_item(
    Extension(OwnedCartItem(item)): Extension<OwnedCartItem>,
) -> ApiResponse<CartItemResponse> {
    ApiResponse::ok(item.into())
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    cart_id: CartItemId,
    JsonBody(req): JsonBody<CartItemRequest>,
) -> Result<ApiResponse<CartItemResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let item = state.carts.update(cart_id.id, req.into()).await?;
    Ok(ApiResponse::ok(item.into()))
}

pub async fn delete_cart_item(
    State(state): State<AppState>,
    cart_id: CartItemId,
) -> Result<ApiResponse<()>, AppError> {
    state.carts.delete(cart_id.id).await?;
    Ok(ApiResponse::ok(()).with_message("cart item deleted"))
}

pub async fn delete_cart_items(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonBody(req): JsonBody<BulkDeleteRequest>,
) -> Result<ApiResponse<DeletedCountResponse>, AppError> {
    if req.ids.is_empty() {
        return Err(AppError::bad_request("ids must not be empty"));
    }
    if req.ids.len() > MAX_BATCH_SIZE {
        return Err(AppError::bad_request(format!(
            "at most {MAX_BATCH_SIZE} ids are allowed per request"
        )));
    }

    // every id is checked before anything is deleted
    ensure_owns_all(state.cart_store.as_ref(), &ctx, &req.ids).await?;

    let count = state.carts.delete_many(&req.ids).await?;
    Ok(ApiResponse::ok(DeletedCountResponse { count }))
}

pub async fn cart_total(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<ApiResponse<CartTotalResponse>, AppError> {
    let total = state.carts.cart_total(ctx.user_id).await?;
    Ok(ApiResponse::ok(CartTotalResponse {
        user_id: ctx.user_id,
        total,
    }))
}
