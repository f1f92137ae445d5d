//! Cart service errors.

use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("{0}")]
    Validation(String),

    #[error("cart item {id} not found")]
    ItemNotFound { id: i64 },

    #[error("product {id} not found")]
    ProductNotFound { id: i64 },

    #[error("{op} failed")]
    Store {
        op: &'static str,
        #[source]
        source: RepoError,
    },
}

impl CartError {
    pub(crate) fn store(op: &'static str) -> impl FnOnce(RepoError) -> Self {
        move |source| Self::Store { op, source }
    }
}
