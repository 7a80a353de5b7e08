//! REST API module
//!
//! This module provides the HTTP server and its surface:
//! - Route wiring and shared handler state
//! - Request-id middleware for log correlation
//! - Server assembly, CORS, and graceful shutdown

pub mod server;
pub mod routes;
pub mod middleware;
pub mod handlers;

pub use server::ApiServer;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
