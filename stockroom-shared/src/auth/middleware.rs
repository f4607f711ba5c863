/// Bearer-token extraction and request identity
///
/// This module turns an inbound request's `Authorization` header into an
/// [`AuthContext`], the identity attached to request extensions by the API's
/// auth layer.
///
/// The central contract: every failure mode — header absent, wrong scheme,
/// bad signature, expired token, malformed payload — collapses to "no
/// identity" (`None`). Callers treat all of them identically and decide
/// whether the route requires identity at all.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use stockroom_shared::auth::jwt::{create_token, Claims};
/// use stockroom_shared::auth::middleware::authenticate;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "secret-key-at-least-32-bytes-long!!!";
/// let token = create_token(&Claims::new(42, "alice"), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_str(&format!("Bearer {}", token))?,
/// );
///
/// let identity = authenticate(&headers, secret).expect("token is valid");
/// assert_eq!(identity.user_id, 42);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{self, Claims};

/// Authenticated identity attached to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor:
///
/// ```
/// use axum::Extension;
/// use stockroom_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.username, auth.user_id)
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i32,

    /// Authenticated username
    pub username: String,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

/// Extracts the bearer token from an `Authorization` header
///
/// Returns `None` if the header is absent, not valid UTF-8, or does not use
/// the `Bearer` scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Resolves the request's identity, if any
///
/// Extracts the bearer token and validates signature and expiry against the
/// process-wide secret. Any failure yields `None` — never an error.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Option<AuthContext> {
    let token = bearer_token(headers)?;
    let claims = jwt::decode_identity(token, secret)?;

    Some(AuthContext::from_claims(claims))
}
