//! Defines the receipt model, its database queries and the rule for naming
//! outgoing receipts.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    church::get_church_data,
    database_id::{ReceiptId, TransactionId},
    transaction::TransactionType,
    user::UserId,
};

/// A printable proof of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// The receipt number.
    pub id: ReceiptId,
    /// Who the receipt is made out to. For saida this is the church itself.
    pub name: String,
    /// The kind of movement the receipt is for.
    #[serde(rename = "type")]
    pub receipt_type: TransactionType,
    /// The positive amount of money.
    pub amount: f64,
    /// The date printed on the receipt.
    pub date: Date,
    /// Free text printed on the receipt.
    pub notes: String,
    /// The user who issued the receipt.
    pub user_id: UserId,
    /// The transaction the receipt was issued for, if any.
    pub transaction_id: Option<TransactionId>,
}

/// The fields needed to store a receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub name: String,
    pub receipt_type: TransactionType,
    pub amount: f64,
    pub date: Date,
    pub notes: String,
    pub user_id: UserId,
    pub transaction_id: Option<TransactionId>,
}

pub fn create_receipt_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS receipt (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('entrada', 'saida', 'transferencia')),
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            user_id INTEGER NOT NULL,
            transaction_id INTEGER UNIQUE,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE RESTRICT,
            FOREIGN KEY(transaction_id) REFERENCES \"transaction\"(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

const RECEIPT_COLUMNS: &str = "id, name, type, amount, date, notes, user_id, transaction_id";

/// Map eight receipt columns starting at `offset` to a [Receipt].
pub fn map_receipt_row_with_offset(row: &Row, offset: usize) -> Result<Receipt, rusqlite::Error> {
    Ok(Receipt {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        receipt_type: row.get(offset + 2)?,
        amount: row.get(offset + 3)?,
        date: row.get(offset + 4)?,
        notes: row.get(offset + 5)?,
        user_id: UserId::new(row.get(offset + 6)?),
        transaction_id: row.get(offset + 7)?,
    })
}

fn map_receipt_row(row: &Row) -> Result<Receipt, rusqlite::Error> {
    map_receipt_row_with_offset(row, 0)
}

/// Work out the name printed on a receipt.
///
/// An outgoing receipt without a name is made out to the church. Every other
/// receipt must be given a name.
///
/// # Errors
/// Returns [Error::ChurchNameMissing] if a saida receipt has no name and the
/// church profile has not been set up, or [Error::Validation] if any other
/// receipt has no name.
pub fn resolve_receipt_name(
    receipt_type: TransactionType,
    name: Option<&str>,
    connection: &Connection,
) -> Result<String, Error> {
    let name = name.map(str::trim).filter(|name| !name.is_empty());

    match (receipt_type, name) {
        (_, Some(name)) => Ok(name.to_owned()),
        (TransactionType::Saida, None) => get_church_data(connection)?
            .map(|church| church.name)
            .ok_or(Error::ChurchNameMissing),
        (_, None) => Err(Error::Validation(
            "Nome é obrigatório para este tipo de recibo.".to_owned(),
        )),
    }
}

/// Insert a receipt.
///
/// # Errors
/// This function will return a:
/// - [Error::UnknownTransaction] if `transaction_id` does not refer to a transaction,
/// - [Error::DuplicateReceipt] if the transaction already has a receipt,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn insert_receipt(new_receipt: &NewReceipt, connection: &Connection) -> Result<Receipt, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO receipt (name, type, amount, date, notes, user_id, transaction_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {RECEIPT_COLUMNS}"
        ))?
        .query_row(
            (
                &new_receipt.name,
                new_receipt.receipt_type,
                new_receipt.amount,
                new_receipt.date,
                &new_receipt.notes,
                new_receipt.user_id.as_i64(),
                new_receipt.transaction_id,
            ),
            map_receipt_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::UnknownTransaction,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateReceipt,
            error => error.into(),
        })
}

/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a receipt.
pub fn get_receipt(id: ReceiptId, connection: &Connection) -> Result<Receipt, Error> {
    connection
        .prepare(&format!("SELECT {RECEIPT_COLUMNS} FROM receipt WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_receipt_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Recibo"),
            error => error.into(),
        })
}

/// Get every receipt, newest first.
pub fn list_receipts(connection: &Connection) -> Result<Vec<Receipt>, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECEIPT_COLUMNS} FROM receipt ORDER BY date DESC, id DESC"
        ))?
        .query_map([], map_receipt_row)?
        .map(|receipt_result| receipt_result.map_err(Error::from))
        .collect()
}
