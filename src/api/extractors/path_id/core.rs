/*
 * Responsibility
 * - Path の `{id}` を正の i64 として受け、リソース別の ID 型にする
 * - 失敗時は AppError::BadRequest (axum の plain-text rejection は返さない)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

pub struct PathId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> PathId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

// Derives would require `T: Clone`; tags are uninhabited.
impl<T> Clone for PathId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PathId<T> {}

impl<T, S> FromRequestParts<S> for PathId<T>
where
    T: Send + Sync,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("invalid id"))?;

        if id <= 0 {
            return Err(AppError::bad_request("invalid id"));
        }
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for PathId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathId").field("id", &self.id).finish()
    }
}
