/*
 * Responsibility
 * - products の読み書き
 * - cart 側からは ProductLookup (id で引くだけ) として見える
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    // unit price
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// Read-by-id view of the catalog used for cart pricing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductLookup: Send + Sync + 'static {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>>;
}

/// Catalog maintenance used by the product endpoints.
#[async_trait]
pub trait ProductCatalog: Send + Sync + 'static {
    async fn list(&self) -> RepoResult<Vec<Product>>;

    async fn get(&self, id: i64) -> RepoResult<Option<Product>>;

    async fn create(&self, fields: ProductFields) -> RepoResult<Product>;

    async fn update(&self, id: i64, fields: ProductFields) -> RepoResult<Option<Product>>;

    /// Soft delete. Returns false when the product is unknown or already gone.
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgProductRepo {
    pool: PgPool,
}

impl PgProductRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM products
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl ProductLookup for PgProductRepo {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        self.fetch(id).await
    }
}

#[async_trait]
impl ProductCatalog for PgProductRepo {
    async fn list(&self) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, created_at, updated_at
            FROM products
            WHERE deleted_at IS NULL
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Product>> {
        self.fetch(id).await
    }

    async fn create(&self, fields: ProductFields) -> RepoResult<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, price, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: i64, fields: ProductFields) -> RepoResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                name = $2,
                description = $3,
                price = $4,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, description, price, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
