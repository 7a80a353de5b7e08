//! Authentication endpoint handlers
//!
//! The handshake endpoints: register, login, logout, and the current-user
//! probe. Each handler validates its input, orchestrates the credential
//! store, password hasher, and token issuer, and translates the outcome
//! into an HTTP status, JSON body, and session cookie.

use crate::api::handlers::AppState;
use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::middleware::AuthUser;
use crate::auth::models::{
    collect_messages, normalize_email, AuthResponse, LoginRequest, RegisterRequest,
    SuccessResponse,
};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::generate_token;
use crate::core::error::{AuthError, Result};
use crate::db::models::{PublicUser, User};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;
use validator::Validate;

/// Handler for POST /api/auth/register - Create an account
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AuthError::Validation(collect_messages(&e)))?;

    let email = normalize_email(&req.email);
    tracing::info!(email = %email, "User registration attempt");

    // Pre-check for an existing account. A registration racing past this
    // lookup still fails: the store's UNIQUE constraint surfaces as the
    // same DuplicateEmail from create().
    if state.user_repo.find_by_email(&email).await?.is_some() {
        tracing::warn!(email = %email, "Registration rejected: email already registered");
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash_password(&req.password)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email,
        password_hash,
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    state.user_repo.create(&user).await?;

    let token = generate_token(&user.id, &state.jwt_secret)?;
    let jar = jar.add(session_cookie(&token, state.cookie_secure));

    tracing::info!(user_id = %user.id, email = %user.email, "User registered successfully");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            user: user.into_public(),
        }),
    ))
}

/// Handler for POST /api/auth/login - Verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    req.validate()
        .map_err(|e| AuthError::Validation(collect_messages(&e)))?;

    let email = normalize_email(&req.email);
    tracing::info!(email = %email, "Login attempt");

    // Unknown email and wrong password collapse to the same response so
    // account existence is never distinguishable from the outside.
    let user = state
        .user_repo
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login failed: password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    let token = generate_token(&user.id, &state.jwt_secret)?;
    let jar = jar.add(session_cookie(&token, state.cookie_secure));

    tracing::info!(user_id = %user.id, "Login successful");

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: user.into_public(),
        }),
    ))
}

/// Handler for POST /api/auth/logout - Clear the session cookie
///
/// This is a client-hint clear only: sessions are stateless, so the signed
/// token itself stays valid until its natural expiry. Idempotent, always
/// succeeds, requires no token.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(clear_session_cookie()),
        Json(SuccessResponse { success: true }),
    )
}

/// Handler for GET /api/auth/me - Current user probe
///
/// Runs behind [`crate::auth::middleware::authenticate`], which has already
/// validated the token and re-fetched the user; this handler only echoes
/// the public fields. The body is the bare user object, which is what the
/// front end assigns to its session cache.
pub async fn me(user: AuthUser) -> Json<PublicUser> {
    tracing::debug!(user_id = %user.id, "Current user probe");

    Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    })
}
