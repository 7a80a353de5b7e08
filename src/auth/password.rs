//! Password hashing and verification using bcrypt
//!
//! Failures here are internal errors, never credential errors: a hashing
//! failure must not be mistakable for a wrong password.

use crate::core::error::{AuthError, Result};

/// Hash a password using bcrypt with the default cost
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AuthError::Internal(format!("failed to hash password: {}", e)))
}

/// Verify a password against a stored digest
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AuthError::Internal(format!("failed to verify password: {}", e)))
}
