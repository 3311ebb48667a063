//! Defines the endpoint for posting a transaction, optionally together with its receipt.

use axum::extract::State;
use rusqlite::Connection;

use crate::{
    Error,
    extract::Json,
    receipt::{NewReceipt, insert_receipt, resolve_receipt_name},
    transaction::{
        ReceiptRequest, Transaction, TransactionDetails, TransactionInput, TransactionState,
        get_transaction_details, insert_transaction,
    },
};

fn non_blank(text: &str) -> Option<&str> {
    Some(text.trim()).filter(|text| !text.is_empty())
}

/// Build the receipt for `transaction`.
///
/// The receipt is made out to the requested name, or else to the person on the
/// transaction, before the usual receipt naming rules apply.
fn receipt_for(
    transaction: &Transaction,
    request: &ReceiptRequest,
    connection: &Connection,
) -> Result<NewReceipt, Error> {
    let name = request
        .name
        .as_deref()
        .and_then(non_blank)
        .or_else(|| non_blank(&transaction.person));

    Ok(NewReceipt {
        name: resolve_receipt_name(transaction.transaction_type, name, connection)?,
        receipt_type: transaction.transaction_type,
        amount: transaction.amount,
        date: transaction.date,
        notes: request
            .notes
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(&transaction.description)
            .to_owned(),
        user_id: transaction.user_id,
        transaction_id: Some(transaction.id),
    })
}

/// A route handler for posting a transaction, responds with the new transaction
/// and its relations.
///
/// When the body has a `receipt` object, the receipt is created in the same
/// database transaction: if it cannot be created, neither row is stored.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Json(input): Json<TransactionInput>,
) -> Result<Json<TransactionDetails>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let new_transaction = input.resolve(&connection)?;

    let db_transaction = connection.unchecked_transaction()?;
    let transaction = insert_transaction(&new_transaction, &db_transaction)?;
    if let Some(request) = &input.receipt {
        let new_receipt = receipt_for(&transaction, request, &db_transaction)?;
        insert_receipt(&new_receipt, &db_transaction)?;
    }
    db_transaction.commit()?;

    tracing::info!(
        "posted {} of {:.2} to caixa {} (transaction {})",
        transaction.transaction_type.as_str(),
        transaction.amount,
        transaction.caixa_id,
        transaction.id
    );

    get_transaction_details(transaction.id, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_state, insert_test_caixa, insert_test_user, test_server},
        transaction::{TransactionDetails, TransactionType},
    };

    #[tokio::test]
    async fn created_transaction_can_be_fetched() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Escola Bíblica");
        let server = test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "entrada",
                "caixa": "escolabiblica",
                "user": "tesoureiro",
                "description": "Oferta da classe",
                "person": "Professora Ana",
                "amount": 87.5,
                "date": "2025-09-21T03:00:00.000Z",
            }))
            .await;

        response.assert_status_ok();
        let created = response.json::<TransactionDetails>();
        assert!(created.transaction.id > 0);
        assert_eq!(created.transaction.date, date!(2025 - 09 - 21));
        assert_eq!(created.caixa.key, "escolabiblica");

        let fetched = server
            .get(&format_endpoint(endpoints::TRANSACTION, created.transaction.id))
            .await
            .json::<TransactionDetails>();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn missing_amount_is_bad_request() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Geral");
        let server = test_server(state);

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "entrada",
                "caixa": "geral",
                "user": "tesoureiro",
                "date": "2025-09-21",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_caixa_is_bad_request() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        let server = test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "entrada",
                "caixa": "naoexiste",
                "user": "tesoureiro",
                "amount": 10,
                "date": "2025-09-21",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Caixa não encontrado");
    }

    #[tokio::test]
    async fn invalid_type_is_bad_request() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Geral");
        let server = test_server(state);

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "carnê",
                "caixa": "geral",
                "user": "tesoureiro",
                "amount": 10,
                "date": "2025-09-21",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn creates_transfer() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Geral");
        insert_test_caixa(&state, "Missões");
        let server = test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "transferencia",
                "caixa": "geral",
                "transferTo": "missoes",
                "user": "tesoureiro",
                "amount": 200,
                "date": "2025-09-21",
            }))
            .await;

        response.assert_status_ok();
        let created = response.json::<TransactionDetails>();
        assert_eq!(
            created.transaction.transaction_type,
            TransactionType::Transferencia
        );
        assert_eq!(created.transfer_to.map(|caixa| caixa.key).as_deref(), Some("missoes"));
    }

    #[tokio::test]
    async fn creates_receipt_with_transaction() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Geral");
        let server = test_server(state);

        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "entrada",
                "caixa": "geral",
                "user": "tesoureiro",
                "description": "Dízimo",
                "person": "João",
                "amount": 300,
                "date": "2025-09-21",
                "receipt": {},
            }))
            .await;

        response.assert_status_ok();
        let created = response.json::<TransactionDetails>();
        let receipt = created.receipt.expect("receipt should have been created");
        assert_eq!(receipt.name, "João");
        assert_eq!(receipt.notes, "Dízimo");
        assert_eq!(receipt.amount, 300.0);
        assert_eq!(receipt.transaction_id, Some(created.transaction.id));
    }

    #[tokio::test]
    async fn failed_receipt_rolls_back_transaction() {
        let state = get_test_state();
        insert_test_user(&state, "tesoureiro");
        insert_test_caixa(&state, "Geral");
        let server = test_server(state);

        // Saida without a name or person needs the church name, which is not set up.
        let response = server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({
                "type": "saida",
                "caixa": "geral",
                "user": "tesoureiro",
                "amount": 50,
                "date": "2025-09-21",
                "receipt": { "notes": "Conta de luz" },
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(
            server
                .get(endpoints::TRANSACTIONS)
                .await
                .json::<Vec<Value>>()
                .is_empty()
        );
    }
}
