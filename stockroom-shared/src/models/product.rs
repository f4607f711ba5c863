/// Product model and database operations
///
/// The catalog's business key is the SKU: one row per SKU, enforced by the
/// unique constraint. Repeat inserts for a SKU merge into the existing row
/// (quantity accumulates) as long as the name matches; a SKU is permanently
/// bound to the name it was first inserted with.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id SERIAL PRIMARY KEY,
///     product_name TEXT NOT NULL,
///     product_type TEXT NOT NULL,
///     sku TEXT NOT NULL UNIQUE,
///     image_url VARCHAR(512),
///     description TEXT NOT NULL,
///     quantity INTEGER NOT NULL CHECK (quantity >= 0),
///     price NUMERIC NOT NULL CHECK (price >= 0),
///     user_id INTEGER NOT NULL REFERENCES users (id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Fixed page size for product listings
pub const PAGE_SIZE: i64 = 10;

/// Product model representing one catalog row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID (serial)
    pub id: i32,

    /// Display name; immutable once the SKU exists
    #[serde(rename = "productName")]
    pub product_name: String,

    /// Product category/type
    #[serde(rename = "type")]
    pub product_type: String,

    /// Stock Keeping Unit, the unique business key
    pub sku: String,

    /// Optional image URL
    pub image_url: Option<String>,

    /// Free-form description
    pub description: String,

    /// Units in stock, never negative
    pub quantity: i32,

    /// Unit price, never negative
    pub price: Decimal,

    /// Owning user
    #[serde(rename = "userID")]
    pub user_id: i32,

    /// When the row was first inserted
    pub created_at: DateTime<Utc>,

    /// When the row was last modified
    pub updated_at: DateTime<Utc>,
}

/// Trimmed projection returned by the paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i32,

    #[serde(rename = "productName")]
    pub product_name: String,

    #[serde(rename = "type")]
    pub product_type: String,

    pub sku: String,

    pub quantity: i32,

    pub price: Decimal,

    #[serde(rename = "userID")]
    pub user_id: i32,
}

/// Input for the add-or-merge operation
///
/// All fields are validated by the HTTP layer before this struct is built;
/// quantity and price are already known to be non-negative.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub product_type: String,
    pub sku: String,
    pub image_url: Option<String>,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub user_id: i32,
}

/// Outcome of [`Product::upsert_by_sku`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkuUpsert {
    /// No row existed for this SKU; a new one was inserted
    Inserted { id: i32 },

    /// A row existed with the same name; its quantity was incremented
    Merged { id: i32 },

    /// A row exists but is bound to a different name; nothing was changed
    NameMismatch { existing_name: String },
}

impl Product {
    /// Inserts a product, or merges quantity into the existing row for its SKU
    ///
    /// This is a single atomic statement: the unique constraint on `sku` is
    /// the final arbiter, so two concurrent requests for a brand-new SKU
    /// cannot double-insert — the loser of the race lands on the update path.
    /// The `DO UPDATE` only applies when the stored name matches the supplied
    /// one; a mismatch updates nothing and reports the existing name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database round-trip fails
    pub async fn upsert_by_sku(pool: &PgPool, data: NewProduct) -> Result<SkuUpsert, sqlx::Error> {
        // xmax = 0 distinguishes a fresh insert from a conflict-update
        let row: Option<(i32, bool)> = sqlx::query_as(
            r#"
            INSERT INTO products
                (product_name, product_type, sku, image_url, description, quantity, price, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (sku) DO UPDATE
            SET quantity = products.quantity + EXCLUDED.quantity,
                updated_at = NOW()
            WHERE products.product_name = EXCLUDED.product_name
            RETURNING id, (xmax = 0) AS inserted
            "#,
        )
        .bind(&data.product_name)
        .bind(&data.product_type)
        .bind(&data.sku)
        .bind(&data.image_url)
        .bind(&data.description)
        .bind(data.quantity)
        .bind(data.price)
        .bind(data.user_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some((id, true)) => Ok(SkuUpsert::Inserted { id }),
            Some((id, false)) => Ok(SkuUpsert::Merged { id }),
            None => {
                // The SKU exists under a different name. The row cannot have
                // been deleted in between (products are never deleted) and
                // its name is immutable, so this lookup always finds it.
                let existing_name: String =
                    sqlx::query_scalar("SELECT product_name FROM products WHERE sku = $1")
                        .bind(&data.sku)
                        .fetch_one(pool)
                        .await?;

                Ok(SkuUpsert::NameMismatch { existing_name })
            }
        }
    }

    /// Finds a product by SKU
    pub async fn find_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_name, product_type, sku, image_url, description,
                   quantity, price, user_id, created_at, updated_at
            FROM products
            WHERE sku = $1
            "#,
        )
        .bind(sku)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Overwrites a product's quantity
    ///
    /// Unlike the upsert path this replaces the stored value, it does not add
    /// to it. One `UPDATE ... RETURNING` statement doubles as the existence
    /// check.
    ///
    /// # Returns
    ///
    /// The new quantity if the product exists, None otherwise
    pub async fn set_quantity(
        pool: &PgPool,
        id: i32,
        quantity: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            UPDATE products
            SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(q,)| q))
    }

    /// Lists one page of products, newest id first
    ///
    /// A page past the end simply returns an empty vector.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductSummary>, sqlx::Error> {
        let products = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT id, product_name, product_type, sku, quantity, price, user_id
            FROM products
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Counts total number of products
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// The product with the highest quantity, if any
    ///
    /// Ties are broken arbitrarily by whatever row the ordering returns
    /// first.
    pub async fn most_stocked(pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_name, product_type, sku, image_url, description,
                   quantity, price, user_id, created_at, updated_at
            FROM products
            ORDER BY quantity DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// The product with the highest price, if any
    pub async fn most_expensive(pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, product_name, product_type, sku, image_url, description,
                   quantity, price, user_id, created_at, updated_at
            FROM products
            ORDER BY price DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }
}
