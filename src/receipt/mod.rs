//! Receipts: printable proofs of the money that came in or went out.

mod core;
mod create_endpoint;
mod get_endpoint;
mod list_endpoint;
mod print_page;

pub use core::{
    NewReceipt, Receipt, create_receipt_table, get_receipt, insert_receipt,
    map_receipt_row_with_offset, resolve_receipt_name,
};
pub use create_endpoint::create_receipt_endpoint;
pub use get_endpoint::get_receipt_endpoint;
pub use list_endpoint::list_receipts_endpoint;
pub use print_page::get_receipt_print_page;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the receipt endpoints.
#[derive(Debug, Clone)]
pub struct ReceiptState {
    /// The database connection for managing receipts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReceiptState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
