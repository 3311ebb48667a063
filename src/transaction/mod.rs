//! The ledger: entries, exits and transfers posted against caixas.
//!
//! Endpoints accept caixas and users either by id or by natural key, see
//! [TransactionInput], and always respond with the joined
//! [TransactionDetails].

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod get_endpoint;
mod input;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionDetails, TransactionType, create_transaction_table,
    delete_transaction, get_transaction_details, insert_transaction, list_transaction_details,
    list_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export_endpoint::export_transactions_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use input::{AmountInput, ReceiptRequest, TransactionInput};
pub use list_endpoint::list_transactions_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the ledger endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
