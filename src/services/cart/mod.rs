//! Cart reconciliation: merge-on-create, repricing from the catalog, totals.

pub mod errors;
pub mod service;

pub use errors::CartError;
pub use service::{CartItemInput, CartService, MAX_BATCH_SIZE};
