//! Session token generation and validation
//!
//! Tokens are signed JWTs (HS256) carrying exactly the owning user's id and
//! an expiry. Sessions are stateless: there is no server-side session record,
//! so a token stays valid until its natural expiry even after logout.

use crate::core::error::{AuthError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Session lifetime, shared by the token expiry and the cookie max-age
pub const SESSION_TTL_DAYS: i64 = 30;

/// JWT claims structure
///
/// The subject is the user's store-assigned id only; no role, scope, or
/// permission claims are encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Generate a session token for a user
pub fn generate_token(user_id: &str, secret: &str) -> Result<String> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(SESSION_TTL_DAYS))
        .ok_or_else(|| AuthError::Internal("failed to calculate token expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("failed to sign token: {}", e)))
}

/// Validate a session token and extract its claims
///
/// Any verification failure (bad signature, expired, malformed) collapses to
/// `Unauthenticated`; the caller never learns which check failed.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::Unauthenticated)
}
