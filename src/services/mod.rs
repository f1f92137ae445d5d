/*
 * Responsibility
 * - ドメインロジック (handler から呼ばれ、repos を使う)
 */
pub mod auth;
pub mod cart;
pub mod users;
