//! Defines the endpoint for issuing a receipt.

use axum::extract::State;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    database_id::TransactionId,
    date::{parse_optional_date, today},
    extract::Json,
    receipt::{NewReceipt, Receipt, ReceiptState, insert_receipt, resolve_receipt_name},
    reference::UserRef,
    transaction::{AmountInput, TransactionType},
};

/// The JSON body for issuing a receipt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptInput {
    /// Optional for saida receipts, which default to the church name.
    pub name: Option<String>,
    /// One of entrada, saida or transferencia.
    #[serde(rename = "type")]
    pub receipt_type: Option<String>,
    /// Required and positive.
    pub amount: Option<AmountInput>,
    /// Defaults to today.
    pub date: Option<String>,
    /// Defaults to "".
    pub notes: Option<String>,
    /// The id of the user issuing the receipt.
    pub user_id: Option<i64>,
    /// The username of the user issuing the receipt.
    pub user: Option<String>,
    /// The transaction to link the receipt to.
    pub transaction_id: Option<TransactionId>,
}

impl ReceiptInput {
    /// Validate the input, resolve the user and work out the receipt name.
    pub fn resolve(&self, connection: &Connection) -> Result<NewReceipt, Error> {
        let receipt_type: TransactionType = self
            .receipt_type
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or(Error::MissingFields)?
            .parse()?;
        let amount = self
            .amount
            .as_ref()
            .ok_or(Error::MissingFields)?
            .to_positive_amount()?;
        let user_ref =
            UserRef::from_input(self.user_id, self.user.as_deref()).ok_or(Error::MissingFields)?;
        let date = parse_optional_date(self.date.as_deref())?.unwrap_or_else(today);

        let user = user_ref.resolve(connection)?;
        let name = resolve_receipt_name(receipt_type, self.name.as_deref(), connection)?;

        Ok(NewReceipt {
            name,
            receipt_type,
            amount,
            date,
            notes: self.notes.as_deref().unwrap_or("").trim().to_owned(),
            user_id: user.id,
            transaction_id: self.transaction_id,
        })
    }
}

/// A route handler for issuing a receipt, responds with the new receipt.
pub async fn create_receipt_endpoint(
    State(state): State<ReceiptState>,
    Json(input): Json<ReceiptInput>,
) -> Result<Json<Receipt>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let new_receipt = input.resolve(&connection)?;
    let receipt = insert_receipt(&new_receipt, &connection)?;
    tracing::info!(
        "issued receipt #{} ({}) for transaction {:?}",
        receipt.id,
        receipt.receipt_type.as_str(),
        receipt.transaction_id
    );

    Ok(Json(receipt))
}
