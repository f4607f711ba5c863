/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login)
/// - `products`: Catalog endpoints (add-or-merge, listing, quantity update)
/// - `analytics`: Most-stocked / most-expensive lookups

pub mod analytics;
pub mod auth;
pub mod health;
pub mod products;
