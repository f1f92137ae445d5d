use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::product_repo::{Product, ProductFields};

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must be >= 0");
        }
        Ok(())
    }
}

impl From<ProductRequest> for ProductFields {
    fn from(req: ProductRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
            price: req.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
