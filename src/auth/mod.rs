//! Log-in for dashboard users and the bearer token guard for user management.

mod log_in;
mod middleware;

pub use log_in::post_log_in;
pub use middleware::admin_guard;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed for logging in and guarding the admin endpoints.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The database connection for looking up credentials.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The token admin requests must carry, if one is configured.
    pub admin_token: Option<String>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            admin_token: state.admin_token.clone(),
        }
    }
}
