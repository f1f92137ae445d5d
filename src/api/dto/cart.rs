/*
 * Responsibility
 * - Cart の request/response DTO
 * - HTTP 境界での形式チェック (上限値など) は validate() に置く
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::cart_repo::CartItem;
use crate::services::cart::CartItemInput;

pub const MAX_QUANTITY: i32 = 999;
pub const MAX_VARIANT_LEN: usize = 50;

// Missing numeric fields decode as 0 and fail validate() with a field message.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemRequest {
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

impl CartItemRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.product_id < 1 {
            return Err("product_id is required");
        }
        if self.quantity < 1 {
            return Err("quantity must be greater than 0");
        }
        if self.quantity > MAX_QUANTITY {
            return Err("quantity must be <= 999");
        }
        if let Some(color) = &self.color
            && color.chars().count() > MAX_VARIANT_LEN
        {
            return Err("color must be <= 50 chars");
        }
        if let Some(size) = &self.size
            && size.chars().count() > MAX_VARIANT_LEN
        {
            return Err("size must be <= 50 chars");
        }
        Ok(())
    }
}

impl From<CartItemRequest> for CartItemInput {
    fn from(req: CartItemRequest) -> Self {
        Self {
            product_id: req.product_id,
            quantity: req.quantity,
            color: req.color,
            size: req.size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            product_id: item.product_id,
            name: item.name,
            quantity: item.quantity,
            price: item.price,
            color: item.color,
            size: item.size,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartTotalResponse {
    pub user_id: i64,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct DeletedCountResponse {
    pub count: u64,
}
