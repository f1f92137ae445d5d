/*
 * Responsibility
 * - URL 構造を定義
 * - 認証 / role / 所有者チェックをどの範囲に掛けるかもここで決める
 *   (route_layer は後に足したものが先に走る)
 */
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::api::handlers::{cart, health::health, products, users};
use crate::middleware::auth::{authenticate, require_cart_owner, require_role};
use crate::services::auth::{Role, RolePolicy};
use crate::state::AppState;

const ADMIN_ONLY: RolePolicy = RolePolicy::allow(&[Role::Admin]);

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .merge(product_routes(state.clone()))
        .merge(cart_routes(state))
}

fn product_routes(state: AppState) -> Router<AppState> {
    let admin_only = || from_fn_with_state(ADMIN_ONLY, require_role);

    Router::new()
        .route(
            "/products",
            get(products::list_products)
                .merge(post(products::create_product).route_layer(admin_only())),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .merge(
                    put(products::update_product)
                        .delete(products::delete_product)
                        .route_layer(admin_only()),
                ),
        )
        .route_layer(from_fn_with_state(state, authenticate))
}

fn cart_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::list_cart).post(cart::create_cart_item))
        .route(
            "/cart/bulk",
            post(cart::create_cart_items).delete(cart::delete_cart_items),
        )
        .route("/cart/total", get(cart::cart_total))
        .route(
            "/cart/{id}",
            get(cart::get_cart_item)
                .put(cart::update_cart_item)
                .delete(cart::delete_cart_item)
                .route_layer(from_fn_with_state(state.clone(), require_cart_owner)),
        )
        .route_layer(from_fn_with_state(state, authenticate))
}
