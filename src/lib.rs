//! Authgate Library
//!
//! This library provides the core functionality for the Authgate service:
//! the credential store, the authentication handshake over a REST API, and
//! an embedded session client for the same API.

pub mod api;
pub mod auth;
pub mod client;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use client::SessionClient;
pub use crate::core::Config;
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for the library
pub type Result<T> = anyhow::Result<T>;
