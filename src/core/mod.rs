//! Core module
//!
//! Application-wide foundations:
//! - Layered configuration
//! - Structured logging
//! - The error type and its wire rendering

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{AuthError, ErrorResponse, Result};
pub use logging::Logger;
