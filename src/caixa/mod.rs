//! Caixas: the named cash boxes that transactions are posted against.

mod balances;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use balances::get_balances_endpoint;
pub use core::{
    Caixa, create_caixa, create_caixa_table, derive_caixa_key, get_caixa_by_id,
    get_caixa_by_key, list_caixas, map_caixa_row_with_offset,
};
pub use create_endpoint::create_caixa_endpoint;
pub use delete_endpoint::delete_caixa_endpoint;
pub use edit_endpoint::edit_caixa_endpoint;
pub use list_endpoint::list_caixas_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the caixa endpoints.
#[derive(Debug, Clone)]
pub struct CaixaState {
    /// The database connection for managing caixas.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CaixaState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
