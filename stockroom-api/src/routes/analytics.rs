/// Analytics endpoint
///
/// Two independent single-row lookups: the product with the highest quantity
/// and the product with the highest price. No aggregation or grouping; ties
/// are broken arbitrarily by whichever row the ordering returns first.
///
/// # Endpoint
///
/// ```text
/// GET /analytics
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "mostStockedProduct": { "id": 3, "productName": "Widget", ... },
///   "mostExpensiveProduct": { "id": 7, "productName": "Gadget", ... }
/// }
/// ```
///
/// Both fields are `null` while the catalog is empty.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use stockroom_shared::{auth::middleware::AuthContext, models::product::Product};

/// Analytics response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    /// Product with the maximum quantity, if any
    pub most_stocked_product: Option<Product>,

    /// Product with the maximum price, if any
    pub most_expensive_product: Option<Product>,
}

/// Analytics endpoint handler
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `500 Internal Server Error`: Server error
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let most_stocked_product = Product::most_stocked(&state.db).await?;
    let most_expensive_product = Product::most_expensive(&state.db).await?;

    Ok(Json(AnalyticsResponse {
        most_stocked_product,
        most_expensive_product,
    }))
}
