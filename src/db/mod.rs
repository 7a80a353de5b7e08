//! Persistence module
//!
//! This module provides the SQLite credential store:
//! - Connection pool management
//! - User repository
//! - Versioned schema migrations
//! - Row and response models

pub mod manager;
pub mod models;
pub mod repository;
pub mod migrations;

pub use manager::DatabaseManager;
pub use models::{PublicUser, User};
pub use repository::UserRepository;
