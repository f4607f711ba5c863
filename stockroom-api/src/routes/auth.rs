/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Signup (account creation)
/// - Login (bearer-token issuance)
///
/// # Endpoints
///
/// - `POST /signup` - Create a new account
/// - `POST /login` - Verify credentials and issue a 24-hour token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use stockroom_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Signup request
///
/// Missing fields deserialize to empty strings so that "absent" and "blank"
/// fail validation the same way, with a field-specific message.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Email address
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    /// Password (minimum 6 characters)
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Identity fields of a created account — never includes the hash
#[derive(Debug, Serialize)]
pub struct UserIdentity {
    /// User ID
    #[serde(rename = "userID")]
    pub user_id: i32,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Human-readable outcome
    pub message: String,

    /// Created user identity
    pub user: UserIdentity,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub username: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Human-readable outcome
    pub message: String,

    /// Signed bearer token, valid for 24 hours
    pub token: String,
}

/// Signup endpoint handler
///
/// Creates a new user account. The username/email collision check is one
/// combined lookup, disambiguated after the fact to report which field
/// collided. The unique constraints remain the backstop for concurrent
/// signups racing past the pre-check.
///
/// # Endpoint
///
/// ```text
/// POST /signup
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "hunter42"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or password shorter than 6 characters
/// - `409 Conflict`: Username or email already exists
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    req.validate()?;

    // One combined lookup; report which field collided
    if let Some(existing) =
        User::find_by_username_or_email(&state.db, &req.username, &req.email).await?
    {
        if existing.username == req.username {
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "New user signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User successfully signed up".to_string(),
            user: UserIdentity {
                user_id: user.id,
                username: user.username,
                email: user.email,
            },
        }),
    ))
}

/// Login endpoint handler
///
/// Verifies credentials and issues a signed 24-hour bearer token carrying
/// the user's id and username.
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "hunter42"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields
/// - `401 Unauthorized`: Unknown username or wrong password
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("No such user exists. Please signup".to_string()))?;

    // Constant-time comparison via Argon2
    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    let claims = jwt::Claims::new(user.id, &user.username);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::debug!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            message: "User successfully signed in".to_string(),
            token,
        }),
    ))
}
