use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// The only id the church profile row may have.
const CHURCH_DATA_ID: DatabaseId = 1;

/// The church profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchData {
    /// Always 1.
    pub id: DatabaseId,
    /// The name printed on receipts, and used as the name of outgoing receipts.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// The church's CNPJ (Brazilian company registry number).
    pub cnpj: Option<String>,
    /// URL of the logo shown on printed receipts.
    pub logo_url: Option<String>,
}

/// The JSON body for saving the church profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurchDataInput {
    /// Required.
    pub name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// The church's CNPJ.
    pub cnpj: Option<String>,
    /// URL of the logo.
    pub logo_url: Option<String>,
}

pub fn create_church_data_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS church_data (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            address TEXT,
            phone TEXT,
            email TEXT,
            cnpj TEXT,
            logo_url TEXT
        )",
        (),
    )?;

    Ok(())
}

fn map_church_data_row(row: &Row) -> Result<ChurchData, rusqlite::Error> {
    Ok(ChurchData {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        cnpj: row.get(5)?,
        logo_url: row.get(6)?,
    })
}

/// Get the church profile, or `None` if it has not been set up yet.
pub fn get_church_data(connection: &Connection) -> Result<Option<ChurchData>, Error> {
    connection
        .prepare(
            "SELECT id, name, address, phone, email, cnpj, logo_url FROM church_data WHERE id = ?1",
        )?
        .query_row([CHURCH_DATA_ID], map_church_data_row)
        .optional()
        .map_err(Error::from)
}

fn optional_text(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Create the church profile, or overwrite it if it exists.
///
/// Blank optional fields are stored as `NULL`.
///
/// # Errors
/// Returns [Error::Validation] if the name is missing or blank.
pub fn upsert_church_data(
    input: &ChurchDataInput,
    connection: &Connection,
) -> Result<ChurchData, Error> {
    let name = optional_text(&input.name)
        .ok_or_else(|| Error::Validation("Nome da igreja é obrigatório.".to_owned()))?;

    connection
        .prepare(
            "INSERT INTO church_data (id, name, address, phone, email, cnpj, logo_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                cnpj = excluded.cnpj,
                logo_url = excluded.logo_url
             RETURNING id, name, address, phone, email, cnpj, logo_url",
        )?
        .query_row(
            (
                CHURCH_DATA_ID,
                name,
                optional_text(&input.address),
                optional_text(&input.phone),
                optional_text(&input.email),
                optional_text(&input.cnpj),
                optional_text(&input.logo_url),
            ),
            map_church_data_row,
        )
        .map_err(Error::from)
}
