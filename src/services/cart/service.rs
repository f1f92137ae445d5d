//! Cart service.
//!
//! The merge on create is a read-then-write without locking: two concurrent
//! creates for the same variant key can both miss the existing row and insert
//! twice, or lose an increment. Nothing here is transactional; a batch that
//! fails half-way keeps the rows already written.

use std::sync::Arc;

use tracing::{info, warn};

use crate::repos::cart_repo::{CartItem, CartItemChanges, CartStore, NewCartItem, VariantKey};
use crate::repos::product_repo::{Product, ProductLookup};
use crate::services::cart::errors::CartError;

/// Upper bound for bulk create / bulk delete requests.
pub const MAX_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItemInput {
    pub product_id: i64,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl CartItemInput {
    // Blank variant tags mean "no variant".
    fn normalized(self) -> Self {
        fn tag(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            color: tag(self.color),
            size: tag(self.size),
            ..self
        }
    }

    fn validate(&self) -> Result<(), CartError> {
        if self.quantity <= 0 {
            return Err(CartError::Validation(
                "quantity must be greater than 0".to_string(),
            ));
        }
        if self.product_id <= 0 {
            return Err(CartError::Validation("product_id is required".to_string()));
        }
        Ok(())
    }

    fn variant_key(&self, user_id: i64) -> VariantKey {
        VariantKey {
            user_id,
            product_id: self.product_id,
            color: self.color.clone(),
            size: self.size.clone(),
        }
    }
}

fn line_price(unit_price: f64, quantity: i32) -> f64 {
    unit_price * f64::from(quantity)
}

#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductLookup>,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, products: Arc<dyn ProductLookup>) -> Self {
        Self { store, products }
    }

    /// All live items of `user_id`; an empty cart is an empty vec.
    pub async fn get_by_user(&self, user_id: i64) -> Result<Vec<CartItem>, CartError> {
        let items = self
            .store
            .list_by_user(user_id)
            .await
            .map_err(CartError::store("fetch cart items"))?;

        info!(user_id, count = items.len(), "cart items fetched");
        Ok(items)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<CartItem, CartError> {
        self.store
            .get(id)
            .await
            .map_err(CartError::store("fetch cart item"))?
            .ok_or(CartError::ItemNotFound { id })
    }

    /// Add a line to the cart, or merge into the line with the same variant key.
    pub async fn create(&self, user_id: i64, input: CartItemInput) -> Result<CartItem, CartError> {
        let input = input.normalized();
        input.validate()?;

        let product = self.resolve_product(input.product_id).await?;

        let existing = self
            .store
            .find_by_variant(&input.variant_key(user_id))
            .await
            .map_err(CartError::store("look up cart variant"))?;

        if let Some(existing) = existing {
            let quantity = existing
                .quantity
                .checked_add(input.quantity)
                .ok_or_else(|| CartError::Validation("quantity is too large".to_string()))?;

            info!(
                cart_id = existing.id,
                new_quantity = quantity,
                "merging into existing cart item"
            );
            return self
                .update(existing.id, CartItemInput { quantity, ..input })
                .await;
        }

        let price = line_price(product.price, input.quantity);
        let item = self
            .store
            .insert(NewCartItem {
                user_id,
                product_id: product.id,
                name: product.name,
                quantity: input.quantity,
                price,
                color: input.color,
                size: input.size,
            })
            .await
            .map_err(CartError::store("create cart item"))?;

        info!(
            user_id,
            cart_id = item.id,
            product_id = item.product_id,
            quantity = item.quantity,
            total_price = item.price,
            "cart item created"
        );
        Ok(item)
    }

    /// Create several lines, one after another.
    ///
    /// Batch size and the shape of every input are checked before the first
    /// write. Product resolution happens per item, so a missing product at
    /// position k fails the call while items before k stay committed.
    pub async fn create_many(
        &self,
        user_id: i64,
        inputs: Vec<CartItemInput>,
    ) -> Result<Vec<CartItem>, CartError> {
        if inputs.len() > MAX_BATCH_SIZE {
            return Err(CartError::Validation(format!(
                "at most {MAX_BATCH_SIZE} items are allowed per request"
            )));
        }

        let inputs: Vec<CartItemInput> = inputs.into_iter().map(CartItemInput::normalized).collect();
        for (index, input) in inputs.iter().enumerate() {
            if let Err(CartError::Validation(msg)) = input.validate() {
                return Err(CartError::Validation(format!("item {}: {msg}", index + 1)));
            }
        }

        let mut created: Vec<CartItem> = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            let item = self.create(user_id, input).await.inspect_err(|e| {
                warn!(user_id, index, error = %e, "bulk cart create stopped");
            })?;

            // A later duplicate merges into an earlier line; keep its latest state once.
            match created.iter_mut().find(|c| c.id == item.id) {
                Some(slot) => *slot = item,
                None => created.push(item),
            }
        }

        info!(user_id, count = created.len(), "bulk cart items created");
        Ok(created)
    }

    /// Overwrite a line, re-pricing it from the current catalog price.
    pub async fn update(&self, id: i64, input: CartItemInput) -> Result<CartItem, CartError> {
        let input = input.normalized();
        input.validate()?;

        self.get_by_id(id).await?;
        let product = self.resolve_product(input.product_id).await?;

        let price = line_price(product.price, input.quantity);
        let item = self
            .store
            .update(
                id,
                CartItemChanges {
                    product_id: product.id,
                    name: product.name,
                    quantity: input.quantity,
                    price,
                    color: input.color,
                    size: input.size,
                },
            )
            .await
            .map_err(CartError::store("update cart item"))?
            .ok_or(CartError::ItemNotFound { id })?;

        info!(
            cart_id = id,
            quantity = item.quantity,
            total_price = item.price,
            "cart item updated"
        );
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CartError> {
        self.get_by_id(id).await?;

        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(CartError::store("delete cart item"))?;
        if !deleted {
            return Err(CartError::ItemNotFound { id });
        }

        info!(cart_id = id, "cart item deleted");
        Ok(())
    }

    /// Delete all `ids` in one store call. Ownership is the caller's job.
    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64, CartError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let count = self
            .store
            .delete_many(ids)
            .await
            .map_err(CartError::store("delete cart items"))?;

        info!(requested = ids.len(), count, "cart items deleted");
        Ok(count)
    }

    /// Sum of stored line prices; 0 for an empty cart.
    pub async fn cart_total(&self, user_id: i64) -> Result<f64, CartError> {
        let items = self.get_by_user(user_id).await?;
        Ok(items.iter().fold(0.0, |total, item| total + item.price))
    }

    async fn resolve_product(&self, product_id: i64) -> Result<Product, CartError> {
        self.products
            .find_by_id(product_id)
            .await
            .map_err(CartError::store("look up product"))?
            .ok_or_else(|| {
                warn!(product_id, "product not found");
                CartError::ProductNotFound { id: product_id }
            })
    }
}
