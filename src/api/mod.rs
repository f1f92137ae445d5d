/*
 * Responsibility
 * - HTTP 層 (dto / extractors / handlers / routes) の公開窓口
 */
pub mod dto;
pub mod envelope;
pub mod extractors;
pub mod handlers;
mod routes;

#[cfg(test)]
mod tests;

pub use routes::routes;
