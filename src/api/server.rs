//! HTTP server assembly
//!
//! Builds the Axum application (routes, middleware stack, CORS) and runs
//! it with graceful shutdown on Ctrl+C or SIGTERM. Every response passes
//! through the request-id and trace layers, so log lines are correlatable
//! across a single request.

use crate::api::handlers::{health_check, not_found, AppState};
use crate::api::middleware::request_id_middleware;
use crate::api::routes::build_auth_routes;
use crate::core::config::ServerConfig;
use crate::core::Config;
use crate::db::manager::DatabaseManager;
use crate::db::repository::UserRepository;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Maximum accepted request body size (10 MB), matching the JSON body limit
/// the front end was built against
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// The assembled application and the address it will bind to
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(config: &Config, db: Arc<DatabaseManager>) -> Self {
        Self {
            router: Self::build_router(config, db),
            config: config.server.clone(),
        }
    }

    /// Assemble routes and the middleware stack
    fn build_router(config: &Config, db: Arc<DatabaseManager>) -> Router {
        let app_state = AppState {
            user_repo: Arc::new(UserRepository::new(db)),
            jwt_secret: Arc::new(config.security.jwt_secret.clone()),
            cookie_secure: config.security.cookie_secure,
        };

        Router::new()
            .route("/api/health", get(health_check))
            .merge(build_auth_routes(app_state))
            .fallback(not_found)
            .layer(
                // Outermost first: request id wraps everything so the
                // trace layer's records land inside the request span
                ServiceBuilder::new()
                    .layer(middleware::from_fn(request_id_middleware))
                    .layer(TraceLayer::new_for_http())
                    .layer(Self::build_cors_layer(&config.security.allowed_origins))
                    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
            )
    }

    /// Build the CORS layer from the allowed origins configuration
    ///
    /// The session cookie must survive cross-origin requests from the
    /// browser front end, so credentials are always allowed. Credentialed
    /// responses cannot use a wildcard origin; a `*` entry mirrors the
    /// request origin instead.
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        if allowed_origins.iter().any(|origin| origin == "*") {
            cors.allow_origin(AllowOrigin::mirror_request())
        } else {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            cors.allow_origin(origins)
        }
    }

    /// Bind and serve until a shutdown signal arrives
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!(addr = %listener.local_addr()?, "Listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    /// The assembled router, for driving the app directly in tests
    pub fn router(&self) -> &Router {
        &self.router
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "ctrl_c", "Shutdown requested"),
        _ = terminate => info!(signal = "sigterm", "Shutdown requested"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::core::config::{DatabaseConfig, LoggingConfig, SecurityConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tower::util::ServiceExt;

    fn test_config(allowed_origins: Vec<String>) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                path: PathBuf::from(":memory:"),
                connection_pool_size: 1,
                busy_timeout: 5000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
                output: "stdout".to_string(),
                log_file: None,
            },
            security: SecurityConfig {
                jwt_secret: "test-secret".to_string(),
                allowed_origins,
                cookie_secure: false,
            },
        }
    }

    fn test_router(allowed_origins: Vec<String>) -> Router {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let server = ApiServer::new(&test_config(allowed_origins), db);
        server.router().clone()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_router(vec!["http://localhost:5173".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_unmatched_route_returns_json_404() {
        let app = test_router(vec!["http://localhost:5173".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Route not found" })
        );
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let app = test_router(vec!["http://localhost:5173".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_with_credentials() {
        let app = test_router(vec!["http://localhost:5173".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/auth/login")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_unlisted_origin() {
        let app = test_router(vec!["http://localhost:5173".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_wildcard_mirrors_request_origin() {
        let app = test_router(vec!["*".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("Origin", "http://anywhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://anywhere.example"
        );
    }
}
