//! The church profile printed on receipts and reports.

mod core;
mod get_endpoint;
mod update_endpoint;

pub use core::{
    ChurchData, ChurchDataInput, create_church_data_table, get_church_data, upsert_church_data,
};
pub use get_endpoint::get_church_endpoint;
pub use update_endpoint::update_church_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the church profile endpoints.
#[derive(Debug, Clone)]
pub struct ChurchState {
    /// The database connection for reading and writing the profile.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ChurchState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
