use axum::extract::State;

use crate::{
    Error,
    database_id::TransactionId,
    extract::{Json, Path},
    transaction::{TransactionDetails, TransactionState, get_transaction_details},
};

/// A route handler that responds with a single transaction, or 404.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<TransactionDetails>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction_details(transaction_id, &connection).map(Json)
}
