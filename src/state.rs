/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - store は trait object で受け取り、service に constructor 経由で注入する
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::cart_repo::CartStore;
use crate::repos::product_repo::{ProductCatalog, ProductLookup};
use crate::repos::user_repo::UserStore;
use crate::services::auth::TokenService;
use crate::services::cart::CartService;
use crate::services::users::UserService;

/// Store handles the state is assembled from.
pub struct Stores {
    pub carts: Arc<dyn CartStore>,
    pub product_lookup: Arc<dyn ProductLookup>,
    pub product_catalog: Arc<dyn ProductCatalog>,
    pub users: Arc<dyn UserStore>,
}

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub carts: Arc<CartService>,
    // ownership checks read cart rows directly
    pub cart_store: Arc<dyn CartStore>,
    pub products: Arc<dyn ProductCatalog>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(tokens: Arc<TokenService>, stores: Stores) -> Self {
        let carts = CartService::new(stores.carts.clone(), stores.product_lookup);
        let users = UserService::new(stores.users, tokens.clone());

        Self {
            tokens,
            carts: Arc::new(carts),
            cart_store: stores.carts,
            products: stores.product_catalog,
            users: Arc::new(users),
        }
    }
}
