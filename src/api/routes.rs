//! API routes

use crate::api::handlers::AppState;
use crate::auth::handlers::{login, logout, me, register};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the authentication routes
///
/// Register, login, and logout are public; the current-user probe sits
/// behind the authentication middleware.
pub fn build_auth_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public_routes.merge(protected_routes).with_state(state)
}
