/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http / cors / security_headers は Router 全体、auth は route 単位で掛ける
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
