//! Creates the database schema.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, caixa::create_caixa_table, church::create_church_data_table,
    receipt::create_receipt_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Enable foreign keys and create all the application tables.
///
/// Tables are created inside a single exclusive transaction and only if they do not
/// already exist, so calling this on an existing database is a no-op.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_caixa_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_receipt_table(&transaction)?;
    create_church_data_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
