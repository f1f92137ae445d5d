/*
 * Responsibility
 * - cart_items の永続化 (CartStore trait + Postgres 実装)
 * - user 単位 / (user, product, color, size) 単位での検索
 * - 削除は hard delete。deleted_at が入っている行は存在しないものとして扱う
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    // product name snapshot taken at write time
    pub name: String,
    pub quantity: i32,
    // unit price * quantity at write time
    pub price: f64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub user_id: i64,
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Full overwrite of the mutable columns of a cart row.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemChanges {
    pub product_id: i64,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// (owner, product, color, size): two requests with the same key refer to the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub user_id: i64,
    pub product_id: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl VariantKey {
    pub fn matches(&self, item: &CartItem) -> bool {
        item.user_id == self.user_id
            && item.product_id == self.product_id
            && item.color == self.color
            && item.size == self.size
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartStore: Send + Sync + 'static {
    /// Non-deleted items owned by `user_id`, oldest first.
    async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<CartItem>>;

    async fn get(&self, id: i64) -> RepoResult<Option<CartItem>>;

    async fn find_by_variant(&self, key: &VariantKey) -> RepoResult<Option<CartItem>>;

    async fn insert(&self, item: NewCartItem) -> RepoResult<CartItem>;

    /// Returns `None` when the row no longer exists.
    async fn update(&self, id: i64, changes: CartItemChanges) -> RepoResult<Option<CartItem>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;

    /// Single statement; returns the number of deleted rows.
    async fn delete_many(&self, ids: &[i64]) -> RepoResult<u64>;
}

const CART_ITEM_COLUMNS: &str = r#"
    id, user_id, product_id, name, quantity, price, color, size,
    created_at, updated_at, deleted_at
"#;

#[derive(Clone, Debug)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<CartItem>> {
        let rows = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            SELECT {CART_ITEM_COLUMNS}
            FROM cart_items
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<CartItem>> {
        let row = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            SELECT {CART_ITEM_COLUMNS}
            FROM cart_items
            WHERE id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_variant(&self, key: &VariantKey) -> RepoResult<Option<CartItem>> {
        // NULL color/size must match NULL, hence IS NOT DISTINCT FROM
        let row = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            SELECT {CART_ITEM_COLUMNS}
            FROM cart_items
            WHERE user_id = $1
                AND product_id = $2
                AND color IS NOT DISTINCT FROM $3
                AND size IS NOT DISTINCT FROM $4
                AND deleted_at IS NULL
            ORDER BY id
            LIMIT 1
            "#
        ))
        .bind(key.user_id)
        .bind(key.product_id)
        .bind(key.color.as_deref())
        .bind(key.size.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert(&self, item: NewCartItem) -> RepoResult<CartItem> {
        let row = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            INSERT INTO cart_items (user_id, product_id, name, quantity, price, color, size)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CART_ITEM_COLUMNS}
            "#
        ))
        .bind(item.user_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.color.as_deref())
        .bind(item.size.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, changes: CartItemChanges) -> RepoResult<Option<CartItem>> {
        let row = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            UPDATE cart_items
            SET
                product_id = $2,
                name = $3,
                quantity = $4,
                price = $5,
                color = $6,
                size = $7,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CART_ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.product_id)
        .bind(&changes.name)
        .bind(changes.quantity)
        .bind(changes.price)
        .bind(changes.color.as_deref())
        .bind(changes.size.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[i64]) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
