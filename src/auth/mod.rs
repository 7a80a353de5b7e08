//! Authentication module
//!
//! This module provides the authentication handshake:
//! - Registration, login, logout, and the current-user probe
//! - Session token issuance and validation
//! - Password hashing and verification
//! - Session cookie construction
//! - Route-guarding middleware

pub mod token;
pub mod password;
pub mod cookie;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use token::{generate_token, validate_token, Claims, SESSION_TTL_DAYS};
pub use password::{hash_password, verify_password};
pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use middleware::{authenticate, AuthUser};
pub use handlers::{login, logout, me, register};
