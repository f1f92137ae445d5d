//! Row ownership checks for cart items.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::api::extractors::{AuthCtx, AuthCtxExtractor, CartItemId};
use crate::error::AppError;
use crate::repos::cart_repo::{CartItem, CartStore};
use crate::state::AppState;

/// Load cart item `id` and check it belongs to the caller.
/// Missing → `NotFound`, someone else's → `Forbidden`.
pub async fn ensure_owner(
    store: &dyn CartStore,
    ctx: &AuthCtx,
    id: i64,
) -> Result<CartItem, AppError> {
    let Some(item) = store.get(id).await? else {
        warn!(user_id = ctx.user_id, cart_id = id, "request rejected: cart item not found");
        return Err(AppError::not_found("cart item"));
    };

    if item.user_id != ctx.user_id {
        warn!(
            user_id = ctx.user_id,
            cart_id = id,
            owner_id = item.user_id,
            "request rejected: cart item owned by another user"
        );
        return Err(AppError::Forbidden);
    }

    Ok(item)
}

/// All-or-nothing ownership check for a batch of ids; the first failing id
/// decides the error.
pub async fn ensure_owns_all(
    store: &dyn CartStore,
    ctx: &AuthCtx,
    ids: &[i64],
) -> Result<(), AppError> {
    for &id in ids {
        ensure_owner(store, ctx, id).await?;
    }
    Ok(())
}

/// Cart item loaded by `require_cart_owner`, handed to the handler through
/// request extensions.
#[derive(Debug, Clone)]
pub struct OwnedCartItem(pub CartItem);

pub async fn require_cart_owner(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    cart_id: CartItemId,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let item = ensure_owner(state.cart_store.as_ref(), &ctx, cart_id.id).await?;

    info!(user_id = ctx.user_id, cart_id = cart_id.id, "cart item ownership verified");
    req.extensions_mut().insert(OwnedCartItem(item));
    Ok(next.run(req).await)
}
