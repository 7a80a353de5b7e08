//! SQLite connection handling
//!
//! A thin r2d2 pool wrapper around rusqlite. Callers never hold raw
//! connections across awaits; synchronous work goes through
//! [`DatabaseManager::execute`], which runs on the blocking thread pool.

use crate::core::error::{AuthError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tokio::task;

const POOL_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handle to the SQLite connection pool
#[derive(Clone)]
pub struct DatabaseManager {
    pool: Pool<SqliteConnectionManager>,
}

impl DatabaseManager {
    /// Open (or create) the database file and bring the schema up to date
    pub fn new(db_path: &Path, pool_size: u32, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            // WAL keeps readers unblocked while a write is in flight
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
        });

        Self::build(manager, pool_size)
    }

    /// In-memory database for tests
    ///
    /// The pool is pinned to a single connection: every new in-memory
    /// connection gets its own private database, so a second one would
    /// see no tables.
    pub fn new_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        Self::build(manager, 1)
    }

    fn build(manager: SqliteConnectionManager, pool_size: u32) -> Result<Self> {
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_timeout(POOL_CHECKOUT_TIMEOUT)
            .build(manager)
            .map_err(|e| AuthError::Internal(format!("connection pool setup failed: {}", e)))?;

        let db = Self { pool };
        db.migrate()?;
        Ok(db)
    }

    /// Check out a pooled connection
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AuthError::Internal(format!("connection checkout failed: {}", e)))
    }

    /// Run a synchronous database closure without blocking the async runtime
    pub async fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| AuthError::Internal(format!("connection checkout failed: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| AuthError::Internal(format!("database task panicked: {}", e)))?
    }

    fn migrate(&self) -> Result<()> {
        let mut conn = self.get_connection()?;
        crate::db::migrations::run_migrations(&mut conn)
    }
}
