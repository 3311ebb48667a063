//! Defines the core data models and database queries for ledger transactions.

use std::str::FromStr;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    caixa::{Caixa, map_caixa_row_with_offset},
    database_id::{CaixaId, TransactionId},
    receipt::{Receipt, map_receipt_row_with_offset},
    user::{User, UserId, map_user_row_with_offset},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in, went out, or moved between two caixas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received, e.g. an offering.
    Entrada,
    /// Money spent.
    Saida,
    /// Money moved from one caixa to another.
    Transferencia,
}

impl TransactionType {
    /// The type as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Entrada => "entrada",
            TransactionType::Saida => "saida",
            TransactionType::Transferencia => "transferencia",
        }
    }

    /// The human readable name, as shown on reports and receipts.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Entrada => "Entrada",
            TransactionType::Saida => "Saída",
            TransactionType::Transferencia => "Transferência",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entrada" => Ok(TransactionType::Entrada),
            "saida" => Ok(TransactionType::Saida),
            "transferencia" => Ok(TransactionType::Transferencia),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An entry in the ledger, posted against a caixa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this is an entry, exit or transfer.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The caixa the money came into or left from.
    pub caixa_id: CaixaId,
    /// What the transaction was for.
    pub description: String,
    /// Who gave or received the money.
    pub person: String,
    /// The amount of money, always positive. The type gives the direction.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The destination caixa, for transfers only.
    pub transfer_to_id: Option<CaixaId>,
    /// The user who recorded the transaction.
    pub user_id: UserId,
}

/// A transaction together with the rows it refers to, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    /// The transaction itself, its fields are inlined in the JSON object.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The caixa the transaction was posted against.
    pub caixa: Caixa,
    /// The user who recorded the transaction.
    pub user: User,
    /// The destination caixa of a transfer.
    pub transfer_to: Option<Caixa>,
    /// The receipt issued for the transaction, if any.
    pub receipt: Option<Receipt>,
}

/// A validated transaction whose references have been resolved to IDs.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether this is an entry, exit or transfer.
    pub transaction_type: TransactionType,
    /// The caixa the money came into or left from.
    pub caixa_id: CaixaId,
    /// What the transaction was for.
    pub description: String,
    /// Who gave or received the money.
    pub person: String,
    /// The positive amount of money.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// The destination caixa, `Some` only for transfers.
    pub transfer_to_id: Option<CaixaId>,
    /// The user who recorded the transaction.
    pub user_id: UserId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('entrada', 'saida', 'transferencia')),
                caixa_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                person TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                transfer_to_id INTEGER,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(caixa_id) REFERENCES caixa(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(transfer_to_id) REFERENCES caixa(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Unqualified, since SQLite does not resolve table aliases in `RETURNING`.
const TRANSACTION_COLUMNS: &str =
    "id, type, caixa_id, description, person, amount, date, transfer_to_id, user_id";

const DETAILS_QUERY: &str = "SELECT t.id, t.type, t.caixa_id, t.description, t.person, \
        t.amount, t.date, t.transfer_to_id, t.user_id, \
        c.id, c.key, c.name, \
        u.id, u.username, u.name, u.role, \
        tc.id, tc.key, tc.name, \
        r.id, r.name, r.type, r.amount, r.date, r.notes, r.user_id, r.transaction_id \
    FROM \"transaction\" t \
    INNER JOIN caixa c ON c.id = t.caixa_id \
    INNER JOIN user u ON u.id = t.user_id \
    LEFT JOIN caixa tc ON tc.id = t.transfer_to_id \
    LEFT JOIN receipt r ON r.transaction_id = t.id";

/// Map the first nine columns of a row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        caixa_id: row.get(2)?,
        description: row.get(3)?,
        person: row.get(4)?,
        amount: row.get(5)?,
        date: row.get(6)?,
        transfer_to_id: row.get(7)?,
        user_id: UserId::new(row.get(8)?),
    })
}

fn map_details_row(row: &Row) -> Result<TransactionDetails, rusqlite::Error> {
    let transaction = map_transaction_row(row)?;
    let caixa = map_caixa_row_with_offset(row, 9)?;
    let user = map_user_row_with_offset(row, 12)?;

    let transfer_to = match row.get::<_, Option<CaixaId>>(16)? {
        Some(_) => Some(map_caixa_row_with_offset(row, 16)?),
        None => None,
    };

    let receipt = match row.get::<_, Option<i64>>(19)? {
        Some(_) => Some(map_receipt_row_with_offset(row, 19)?),
        None => None,
    };

    Ok(TransactionDetails {
        transaction,
        caixa,
        user,
        transfer_to,
        receipt,
    })
}

/// Insert a transaction.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error, e.g. a foreign key
/// that does not refer to an existing row.
pub fn insert_transaction(
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (type, caixa_id, description, person, amount, date, transfer_to_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.transaction_type,
                new_transaction.caixa_id,
                &new_transaction.description,
                &new_transaction.person,
                new_transaction.amount,
                new_transaction.date,
                new_transaction.transfer_to_id,
                new_transaction.user_id.as_i64(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Overwrite every field of the transaction with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction.
pub fn update_transaction(
    id: TransactionId,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET type = ?1, caixa_id = ?2, description = ?3, person = ?4, amount = ?5,
                 date = ?6, transfer_to_id = ?7, user_id = ?8
             WHERE id = ?9
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.transaction_type,
                new_transaction.caixa_id,
                &new_transaction.description,
                &new_transaction.person,
                new_transaction.amount,
                new_transaction.date,
                new_transaction.transfer_to_id,
                new_transaction.user_id.as_i64(),
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Transação"),
            error => error.into(),
        })
}

/// Retrieve a transaction and the rows it refers to by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction_details(
    id: TransactionId,
    connection: &Connection,
) -> Result<TransactionDetails, Error> {
    connection
        .prepare(&format!("{DETAILS_QUERY} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_details_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Transação"),
            error => error.into(),
        })
}

/// Get every transaction with its related rows, newest first.
pub fn list_transaction_details(connection: &Connection) -> Result<Vec<TransactionDetails>, Error> {
    connection
        .prepare(&format!("{DETAILS_QUERY} ORDER BY t.date DESC, t.id DESC"))?
        .query_map([], map_details_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get every transaction without its related rows.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Delete the transaction with `id` and the receipt linked to it.
///
/// Both deletes happen in one database transaction, so either both rows are
/// gone or neither is.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let receipts_deleted =
        transaction.execute("DELETE FROM receipt WHERE transaction_id = ?1", [id])?;
    let rows_affected = transaction.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        // Dropping the transaction rolls it back.
        return Err(Error::NotFound("Transação"));
    }

    transaction.commit()?;
    tracing::debug!("deleted transaction {id} and {receipts_deleted} receipt(s)");

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
