/// Authentication utilities
///
/// This module provides the authentication primitives for Stockroom:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT bearer-token generation and validation
/// - [`middleware`]: Bearer-token extraction and request identity
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations,
///   randomized per-password salt
/// - **JWT Tokens**: HS256 signing, 24-hour expiry, verified purely by
///   signature and expiry (no server-side revocation list)
/// - **Constant-time Comparison**: Password verification uses Argon2's
///   constant-time comparison
///
/// # Example
///
/// ```no_run
/// use stockroom_shared::auth::password::{hash_password, verify_password};
/// use stockroom_shared::auth::jwt::{create_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Bearer token issuance
/// let claims = Claims::new(42, "alice");
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
