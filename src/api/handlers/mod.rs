pub mod system;

pub use system::*;

use crate::db::repository::UserRepository;
use std::sync::Arc;

/// Shared application state for handlers
///
/// Everything here is cheap to clone: the repository shares its connection
/// pool and the secret is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub jwt_secret: Arc<String>,
    pub cookie_secure: bool,
}
