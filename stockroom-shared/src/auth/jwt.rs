/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for user
/// authentication. Tokens are signed using HS256 (HMAC-SHA256) and carry the
/// user's identity (numeric user id and username).
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 24 hours from issuance
/// - **Validation**: Signature and expiration checks only — tokens are not
///   persisted and there is no server-side revocation list
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use stockroom_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "alice");
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, 42);
/// assert_eq!(validated.username, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Lifetime of an issued token
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: Subject (numeric user id)
/// - `username`: Username the token was issued to
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: i32,

    /// Username (custom claim)
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims expiring [`TOKEN_TTL_HOURS`] from now
    ///
    /// # Example
    ///
    /// ```
    /// use stockroom_shared::auth::jwt::Claims;
    ///
    /// let claims = Claims::new(42, "alice");
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(user_id: i32, username: impl Into<String>) -> Self {
        Self::with_expiration(user_id, username, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Creates claims with a custom expiration
    ///
    /// Mainly useful in tests for minting already-expired tokens.
    pub fn with_expiration(user_id: i32, username: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            username: username.into(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
///
/// # Security
///
/// The secret should be:
/// - At least 32 bytes (256 bits) for HS256
/// - Randomly generated
/// - Stored securely (environment variable or secret manager)
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies that the signature is valid and the token hasn't expired.
///
/// # Errors
///
/// Returns an error if:
/// - Signature is invalid
/// - Token has expired
/// - Token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Decodes a token into an identity, swallowing every failure
///
/// Bad signature, expired, and malformed payloads all collapse to "no
/// identity" — callers treat the result exactly like a missing header and
/// decide for themselves whether the route requires identity at all.
///
/// # Example
///
/// ```
/// use stockroom_shared::auth::jwt::{create_token, decode_identity, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = create_token(&Claims::new(7, "bob"), "secret")?;
///
/// assert!(decode_identity(&token, "secret").is_some());
/// assert!(decode_identity(&token, "wrong-secret").is_none());
/// assert!(decode_identity("not-a-token", "secret").is_none());
/// # Ok(())
/// # }
/// ```
pub fn decode_identity(token: &str, secret: &str) -> Option<Claims> {
    validate_token(token, secret).ok()
}
