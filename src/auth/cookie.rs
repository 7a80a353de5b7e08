//! Session cookie construction
//!
//! The signed session token travels in an HTTP-only cookie so it is never
//! exposed to client script. Logout clears the cookie with a zero max-age
//! removal cookie; the token itself is not revoked.

use crate::auth::token::SESSION_TTL_DAYS;
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "token";

/// Create the session cookie for a freshly issued token
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Create the removal cookie that clears the session
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
