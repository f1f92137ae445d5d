//! In-memory store fakes for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Barrier;

use crate::repos::cart_repo::{CartItem, CartItemChanges, CartStore, NewCartItem, VariantKey};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::product_repo::{Product, ProductCatalog, ProductFields, ProductLookup};
use crate::repos::user_repo::{NewUser, UserRow, UserStore};

#[derive(Default)]
struct CartRows {
    items: Vec<CartItem>,
    next_id: i64,
}

#[derive(Default)]
pub struct MemoryCartStore {
    rows: Mutex<CartRows>,
    // Holds every variant lookup until N callers have read, to force check-then-act races.
    variant_barrier: Option<Arc<Barrier>>,
    get_calls: AtomicUsize,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variant_barrier(barrier: Arc<Barrier>) -> Self {
        Self {
            variant_barrier: Some(barrier),
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<CartItem> {
        self.rows.lock().unwrap().items.clone()
    }

    /// Number of `get` calls served so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<CartItem>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .items
            .iter()
            .filter(|i| i.user_id == user_id && i.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> RepoResult<Option<CartItem>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .items
            .iter()
            .find(|i| i.id == id && i.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_variant(&self, key: &VariantKey) -> RepoResult<Option<CartItem>> {
        let found = {
            let rows = self.rows.lock().unwrap();
            rows.items
                .iter()
                .find(|i| key.matches(i) && i.deleted_at.is_none())
                .cloned()
        };

        if let Some(barrier) = &self.variant_barrier {
            barrier.wait().await;
        }

        Ok(found)
    }

    async fn insert(&self, item: NewCartItem) -> RepoResult<CartItem> {
        let mut rows = self.rows.lock().unwrap();
        rows.next_id += 1;
        let now = Utc::now();
        let row = CartItem {
            id: rows.next_id,
            user_id: item.user_id,
            product_id: item.product_id,
            name: item.name,
            quantity: item.quantity,
            price: item.price,
            color: item.color,
            size: item.size,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.items.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: CartItemChanges) -> RepoResult<Option<CartItem>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows
            .items
            .iter_mut()
            .find(|i| i.id == id && i.deleted_at.is_none())
        else {
            return Ok(None);
        };

        row.product_id = changes.product_id;
        row.name = changes.name;
        row.quantity = changes.quantity;
        row.price = changes.price;
        row.color = changes.color;
        row.size = changes.size;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.items.len();
        rows.items.retain(|i| i.id != id);
        Ok(rows.items.len() < before)
    }

    async fn delete_many(&self, ids: &[i64]) -> RepoResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.items.len();
        rows.items.retain(|i| !ids.contains(&i.id));
        Ok((before - rows.items.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryProducts {
    products: Mutex<Vec<Product>>,
}

impl MemoryProducts {
    pub fn sample(id: i64, name: &str, price: f64) -> Option<Product> {
        let now = Utc::now();
        Some(Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_products(products: &[(i64, &str, f64)]) -> Self {
        let rows = products
            .iter()
            .filter_map(|(id, name, price)| Self::sample(*id, name, *price))
            .collect();
        Self {
            products: Mutex::new(rows),
        }
    }

    pub fn set_price(&self, id: i64, price: f64) {
        let mut products = self.products.lock().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.id == id) {
            p.price = price;
        }
    }
}

#[async_trait]
impl ProductLookup for MemoryProducts {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

#[async_trait]
impl ProductCatalog for MemoryProducts {
    async fn list(&self) -> RepoResult<Vec<Product>> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Product>> {
        self.find_by_id(id).await
    }

    async fn create(&self, fields: ProductFields) -> RepoResult<Product> {
        let mut products = self.products.lock().unwrap();
        let now = Utc::now();
        let product = Product {
            id: products.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            created_at: now,
            updated_at: now,
        };
        products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, fields: ProductFields) -> RepoResult<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = fields.name;
        product.description = fields.description;
        product.price = fields.price;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<UserRow>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> RepoResult<UserRow> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict);
        }
        let now = Utc::now();
        let row = UserRow {
            id: users.len() as i64 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            phone_number: user.phone_number,
            date_of_birth: user.date_of_birth,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }
}
