use axum::extract::State;

use crate::{
    Error,
    extract::Json,
    transaction::{TransactionDetails, TransactionState, list_transaction_details},
};

/// A route handler that responds with every transaction, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Vec<TransactionDetails>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    list_transaction_details(&connection).map(Json)
}
