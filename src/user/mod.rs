//! Dashboard users: the people allowed to post transactions and issue receipts.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    NewUser, Role, User, UserId, create_user, create_user_table, get_credentials,
    get_user_by_id, get_user_by_username, map_user_row_with_offset, update_password,
};
pub use create_endpoint::create_user_endpoint;
pub use delete_endpoint::delete_user_endpoint;
pub use edit_endpoint::edit_user_endpoint;
pub use list_endpoint::list_users_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the user management endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost for hashing new passwords.
    pub password_cost: u32,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_cost: state.password_cost,
        }
    }
}
