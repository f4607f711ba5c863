/// Product catalog endpoints
///
/// This module provides the catalog endpoints:
/// - Add or merge a product by SKU
/// - Paginated listing
/// - Quantity overwrite
///
/// # Endpoints
///
/// - `POST /products` - Insert a new SKU, or merge quantity into an existing one
/// - `GET /products?page=N` - List products, 10 per page, newest id first
/// - `PUT /products/:id/quantity` - Overwrite a product's quantity
///
/// All three require a valid bearer token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_shared::{
    auth::middleware::AuthContext,
    models::product::{NewProduct, Product, ProductSummary, SkuUpsert, PAGE_SIZE},
};
use validator::Validate;

/// Add-or-merge request
///
/// String fields default to empty when absent so that "missing" and "blank"
/// fail validation with the same field-specific message. Quantity and price
/// stay `Option` because "required" and "out of range" carry different
/// messages.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductRequest {
    /// Product display name
    #[serde(default)]
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,

    /// Product category/type
    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "Product type is required"))]
    pub product_type: String,

    /// Stock Keeping Unit, the unique business key
    #[serde(default)]
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,

    /// Optional image URL
    pub image_url: Option<String>,

    /// Free-form description
    #[serde(default)]
    #[validate(length(min = 1, message = "Product description is required"))]
    pub description: String,

    /// Units to add (non-negative integer)
    #[validate(range(min = 0, message = "Quantity must be a non-negative integer"))]
    pub quantity: Option<i32>,

    /// Unit price (non-negative decimal; number or numeric string)
    pub price: Option<Decimal>,
}

/// Reference to a product row
#[derive(Debug, Serialize)]
pub struct ProductRef {
    /// Product ID
    pub id: i32,
}

/// Add-or-merge response
#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    /// Human-readable outcome
    pub message: String,

    /// The affected product
    pub product: ProductRef,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 1-based page number; values below 1 are clamped to 1
    pub page: Option<i64>,
}

/// Pagination metadata for the listing response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_products: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Listing response
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    /// Human-readable outcome
    pub message: String,

    /// One page of products, newest id first
    pub products: Vec<ProductSummary>,

    /// Pagination metadata
    pub pagination: Pagination,
}

/// Quantity overwrite request
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// Replacement quantity (non-negative)
    pub quantity: Option<i32>,
}

/// Quantity overwrite response
#[derive(Debug, Serialize)]
pub struct UpdateQuantityResponse {
    /// Human-readable outcome
    pub message: String,

    /// The affected product
    #[serde(rename = "productId")]
    pub product_id: i32,

    /// The stored quantity after the update
    pub quantity: i32,
}

/// Add-or-merge endpoint handler
///
/// Field validation precedes any store access. The store operation itself is
/// one atomic insert-or-update keyed by the unique SKU column, so two
/// concurrent requests for a brand-new SKU cannot double-insert; the loser
/// of the race merges instead.
///
/// # Endpoint
///
/// ```text
/// POST /products
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "name": "Widget",
///   "type": "hardware",
///   "sku": "WID-001",
///   "description": "A fine widget",
///   "quantity": 5,
///   "price": 12.5
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or invalid field
/// - `401 Unauthorized`: Missing or invalid token
/// - `409 Conflict`: SKU already bound to a different name
/// - `500 Internal Server Error`: Server error
pub async fn add_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<AddProductRequest>,
) -> ApiResult<(StatusCode, Json<AddProductResponse>)> {
    req.validate()?;

    let quantity = req
        .quantity
        .ok_or_else(|| ApiError::BadRequest("Product quantity is required".to_string()))?;
    let price = req
        .price
        .ok_or_else(|| ApiError::BadRequest("Product price is required".to_string()))?;

    if price < Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Price must be a non-negative number".to_string(),
        ));
    }

    let outcome = Product::upsert_by_sku(
        &state.db,
        NewProduct {
            product_name: req.name,
            product_type: req.product_type,
            sku: req.sku.clone(),
            image_url: req.image_url,
            description: req.description,
            quantity,
            price,
            user_id: auth.user_id,
        },
    )
    .await?;

    match outcome {
        SkuUpsert::Inserted { id } => {
            tracing::info!(product_id = id, sku = %req.sku, "Product added");
            Ok((
                StatusCode::CREATED,
                Json(AddProductResponse {
                    message: "Product added successfully".to_string(),
                    product: ProductRef { id },
                }),
            ))
        }
        SkuUpsert::Merged { id } => {
            tracing::info!(product_id = id, sku = %req.sku, "Product quantity merged");
            Ok((
                StatusCode::CREATED,
                Json(AddProductResponse {
                    message: "Product quantity updated successfully".to_string(),
                    product: ProductRef { id },
                }),
            ))
        }
        SkuUpsert::NameMismatch { existing_name } => Err(ApiError::Conflict(format!(
            "Product with SKU {} already exists with different name: {}",
            req.sku, existing_name
        ))),
    }
}

/// Listing endpoint handler
///
/// Fixed page size of 10, ordered by descending id. A page number below 1 is
/// clamped to 1; a page past the end returns an empty set rather than
/// erroring.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `500 Internal Server Error`: Server error
pub async fn list_products(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListProductsResponse>> {
    let current_page = query.page.unwrap_or(1).max(1);

    let total_products = Product::count(&state.db).await?;
    let total_pages = (total_products + PAGE_SIZE - 1) / PAGE_SIZE;

    let offset = PAGE_SIZE.saturating_mul(current_page - 1);
    let products = Product::list_page(&state.db, PAGE_SIZE, offset).await?;

    Ok(Json(ListProductsResponse {
        message: "Products retrieved successfully".to_string(),
        products,
        pagination: Pagination {
            current_page,
            total_pages,
            total_products,
            items_per_page: PAGE_SIZE,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        },
    }))
}

/// Quantity overwrite endpoint handler
///
/// Replaces the stored quantity with the supplied value — unlike the
/// add-or-merge path, which adds to it. The update statement doubles as the
/// existence check, so a nonexistent id mutates nothing.
///
/// # Endpoint
///
/// ```text
/// PUT /products/42/quantity
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "quantity": 17 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or negative quantity
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No product with this id
/// - `500 Internal Server Error`: Server error
pub async fn update_quantity(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateQuantityRequest>,
) -> ApiResult<(StatusCode, Json<UpdateQuantityResponse>)> {
    let quantity = match req.quantity {
        Some(q) if q >= 0 => q,
        _ => {
            return Err(ApiError::BadRequest(
                "Valid quantity is required (must be a non-negative number)".to_string(),
            ))
        }
    };

    let stored = Product::set_quantity(&state.db, id, quantity)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    tracing::debug!(product_id = id, quantity = stored, "Quantity overwritten");

    Ok((
        StatusCode::CREATED,
        Json(UpdateQuantityResponse {
            message: "Quantity updated successfully".to_string(),
            product_id: id,
            quantity: stored,
        }),
    ))
}
