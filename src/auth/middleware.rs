//! Authentication middleware
//!
//! Guards protected routes: reads the session token from the session cookie
//! (falling back to an `Authorization: Bearer` header), validates it, and
//! re-fetches the user so handlers always see current store state.

use crate::api::handlers::AppState;
use crate::auth::cookie::SESSION_COOKIE;
use crate::auth::token::validate_token;
use crate::core::error::{AuthError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

/// Authenticated user injected into request extensions
///
/// Carries only the public fields; the password digest never leaves the
/// repository layer.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Authentication middleware
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match token_from_request(&request) {
        Some(token) => token,
        None => {
            tracing::debug!("Request without session token");
            return AuthError::Unauthenticated.into_response();
        }
    };

    let claims = match validate_token(&token, &state.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => return e.into_response(),
    };

    // The token only asserts an id; the user record is re-fetched so a
    // deleted account cannot keep an authenticated session.
    let user = match state.user_repo.find_by_id(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = %claims.sub, "Valid token for unknown user");
            return AuthError::Unauthenticated.into_response();
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        name: user.name,
        email: user.email,
    });

    next.run(request).await
}

/// Pull the session token from the cookie, then the Authorization header
fn token_from_request(request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());

    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer ").map(|t| t.to_string()))
        })
}

// Lets handlers take AuthUser as an argument once the middleware has run
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}
