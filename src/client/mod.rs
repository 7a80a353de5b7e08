//! Session client
//!
//! A Rust client for the authentication API that mirrors the browser front
//! end it replaces: it wraps the register/login/logout calls and the
//! startup probe, keeps the session cookie in reqwest's cookie store, and
//! caches the current public user in memory.
//!
//! The cache is a UI convenience, not a security boundary; the server stays
//! the source of truth through token validity.

use crate::auth::models::{AuthResponse, SuccessResponse};
use crate::core::error::ErrorResponse;
use crate::db::models::PublicUser;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors surfaced by the session client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request. Carries the HTTP status and the
    /// server's `errors` list unchanged; mapping messages to form fields
    /// is the caller's concern.
    #[error("request rejected ({status}): {errors:?}")]
    Rejected {
        status: StatusCode,
        errors: Vec<String>,
    },
}

/// Result type alias for session client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(rename = "confirmPassword")]
    confirm_password: &'a str,
}

/// Client-side session state and API wrapper
///
/// The session cookie lives in the underlying HTTP client's cookie store:
/// login and register capture it from `Set-Cookie`, and the server's
/// removal cookie on logout evicts it, so later requests carry no token.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
    user: Option<PublicUser>,
}

impl SessionClient {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:5000`)
    pub fn new(base_url: &str) -> ClientResult<Self> {
        // A trailing slash keeps Url::join from replacing the last path
        // segment of a prefixed base.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("authgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            user: None,
        })
    }

    /// Register a new account and start a session
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> ClientResult<PublicUser> {
        let response = self
            .http
            .post(self.endpoint("api/auth/register")?)
            .json(&RegisterBody {
                name,
                email,
                password,
                confirm_password,
            })
            .send()
            .await?;

        let auth: AuthResponse = parse_json(response).await?;
        self.user = Some(auth.user.clone());

        Ok(auth.user)
    }

    /// Log in with existing credentials and start a session
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<PublicUser> {
        let response = self
            .http
            .post(self.endpoint("api/auth/login")?)
            .json(&LoginBody { email, password })
            .send()
            .await?;

        let auth: AuthResponse = parse_json(response).await?;
        self.user = Some(auth.user.clone());

        Ok(auth.user)
    }

    /// End the session
    ///
    /// The cache is cleared only after the server call resolves, never
    /// optimistically: a transport failure leaves the cached user in place.
    pub async fn logout(&mut self) -> ClientResult<()> {
        let response = self
            .http
            .post(self.endpoint("api/auth/logout")?)
            .send()
            .await?;

        let _: SuccessResponse = parse_json(response).await?;
        self.user = None;

        Ok(())
    }

    /// Probe the current-user endpoint and populate the cache
    ///
    /// Intended for app startup. "Not logged in" is a steady state rather
    /// than an error, so any failure clears the cache silently.
    pub async fn init(&mut self) {
        self.user = self.fetch_current_user().await.ok();
    }

    /// The cached public user, if a session is active
    pub fn current_user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    /// Whether a user is currently cached as logged in
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    async fn fetch_current_user(&self) -> ClientResult<PublicUser> {
        let response = self
            .http
            .get(self.endpoint("api/auth/me")?)
            .send()
            .await?;

        parse_json(response).await
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Deserialize a success body, or turn a failure status into `Rejected`
/// carrying the server's `errors` list.
async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> ClientResult<T> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let errors = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.errors)
        .unwrap_or_default();

    Err(ClientError::Rejected { status, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiServer;
    use crate::core::config::{
        Config, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
    };
    use crate::db::manager::DatabaseManager;
    use std::path::PathBuf;
    use std::sync::Arc;

    /// Serve the real router on an ephemeral port and return its base url.
    async fn spawn_server() -> String {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
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
                allowed_origins: vec!["http://localhost:5173".to_string()],
                cookie_secure: false,
            },
        };

        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let router = ApiServer::new(&config, db).router().clone();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_register_then_login_with_case_varied_email() {
        let base_url = spawn_server().await;
        let mut client = SessionClient::new(&base_url).unwrap();

        let registered = client
            .register("Alice", "alice@test.com", "Password123!", "Password123!")
            .await
            .unwrap();
        assert_eq!(registered.name, "Alice");
        assert_eq!(registered.email, "alice@test.com");
        assert!(client.is_authenticated());

        let logged_in = client
            .login("ALICE@TEST.com", "Password123!")
            .await
            .unwrap();
        assert_eq!(logged_in.id, registered.id);
        assert_eq!(client.current_user().unwrap().id, registered.id);
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_rejected_generically() {
        let base_url = spawn_server().await;
        let mut client = SessionClient::new(&base_url).unwrap();

        let err = client
            .login("nouser@test.com", "whatever1")
            .await
            .unwrap_err();

        match err {
            ClientError::Rejected { status, errors } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(errors, vec!["Invalid credentials"]);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_validation_errors_propagate_unchanged() {
        let base_url = spawn_server().await;
        let mut client = SessionClient::new(&base_url).unwrap();

        let err = client
            .register("Bob", "bob@test.com", "short", "short")
            .await
            .unwrap_err();

        match err {
            ClientError::Rejected { status, errors } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(errors, vec!["Password must be 8+ characters"]);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(client.current_user().is_none());
    }

    #[tokio::test]
    async fn test_session_cookie_authenticates_the_probe() {
        let base_url = spawn_server().await;
        let mut client = SessionClient::new(&base_url).unwrap();

        client
            .register("Alice", "alice@test.com", "Password123!", "Password123!")
            .await
            .unwrap();

        // A fresh probe re-populates the cache from the cookie alone.
        client.init().await;
        assert!(client.is_authenticated());
        assert_eq!(client.current_user().unwrap().email, "alice@test.com");
    }

    #[tokio::test]
    async fn test_logout_clears_cache_and_cookie() {
        let base_url = spawn_server().await;
        let mut client = SessionClient::new(&base_url).unwrap();

        client
            .register("Alice", "alice@test.com", "Password123!", "Password123!")
            .await
            .unwrap();
        assert!(client.is_authenticated());

        client.logout().await.unwrap();
        assert!(!client.is_authenticated());

        // The removal cookie evicted the session from the cookie store, so
        // the probe now runs unauthenticated and stays silent about it.
        client.init().await;
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_init_without_session_is_a_quiet_no() {
        let base_url = spawn_server().await;
        let mut client = SessionClient::new(&base_url).unwrap();

        client.init().await;

        assert!(!client.is_authenticated());
        assert!(client.current_user().is_none());
    }
}
