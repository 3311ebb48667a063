use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::CaixaId};

/// A named cash box, e.g. "Escola Bíblica".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caixa {
    /// The id for the caixa.
    pub id: CaixaId,
    /// The stable identifier derived from the name when the caixa was created.
    ///
    /// Renaming a caixa does not change its key.
    pub key: String,
    /// The display name.
    pub name: String,
}

/// Derive the key of a caixa from its name.
///
/// The name is lowercased, Latin diacritics are folded to the base letter and
/// anything that is not an ASCII letter or digit is dropped, so
/// "Escola Bíblica" becomes "escolabiblica".
pub fn derive_caixa_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

pub fn create_caixa_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS caixa (
            id INTEGER PRIMARY KEY,
            key TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a row of `id, key, name` starting at `offset` to a [Caixa].
pub fn map_caixa_row_with_offset(row: &Row, offset: usize) -> Result<Caixa, rusqlite::Error> {
    Ok(Caixa {
        id: row.get(offset)?,
        key: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
    })
}

fn map_caixa_row(row: &Row) -> Result<Caixa, rusqlite::Error> {
    map_caixa_row_with_offset(row, 0)
}

/// Create a caixa named `name`, deriving its key.
///
/// # Errors
/// Returns [Error::Validation] if the name is blank or has no letters or digits
/// to build a key from, or [Error::DuplicateCaixa] if the derived key is taken.
pub fn create_caixa(name: &str, connection: &Connection) -> Result<Caixa, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Nome do caixa é obrigatório.".to_owned()));
    }

    let key = derive_caixa_key(name);
    if key.is_empty() {
        return Err(Error::Validation(
            "O nome do caixa precisa conter letras ou números.".to_owned(),
        ));
    }

    connection
        .prepare("INSERT INTO caixa (key, name) VALUES (?1, ?2) RETURNING id, key, name")?
        .query_row((&key, name), map_caixa_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCaixa,
            error => error.into(),
        })
}

/// Get every caixa in the order they were created.
pub fn list_caixas(connection: &Connection) -> Result<Vec<Caixa>, Error> {
    connection
        .prepare("SELECT id, key, name FROM caixa ORDER BY id ASC")?
        .query_map([], map_caixa_row)?
        .map(|caixa_result| caixa_result.map_err(Error::from))
        .collect()
}

/// # Errors
/// Returns [Error::NotFound] if no caixa has the key `key`.
pub fn get_caixa_by_key(key: &str, connection: &Connection) -> Result<Caixa, Error> {
    connection
        .prepare("SELECT id, key, name FROM caixa WHERE key = :key")?
        .query_row(&[(":key", &key)], map_caixa_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Caixa"),
            error => error.into(),
        })
}

/// # Errors
/// Returns [Error::NotFound] if no caixa has the id `id`.
pub fn get_caixa_by_id(id: CaixaId, connection: &Connection) -> Result<Caixa, Error> {
    connection
        .prepare("SELECT id, key, name FROM caixa WHERE id = :id")?
        .query_row(&[(":id", &id)], map_caixa_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Caixa"),
            error => error.into(),
        })
}

/// Change the display name of the caixa with `key`. The key is kept.
///
/// # Errors
/// Returns [Error::NotFound] if no caixa has the key `key`.
pub fn rename_caixa(key: &str, name: &str, connection: &Connection) -> Result<Caixa, Error> {
    connection
        .prepare("UPDATE caixa SET name = ?1 WHERE key = ?2 RETURNING id, key, name")?
        .query_row((name.trim(), key), map_caixa_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Caixa"),
            error => error.into(),
        })
}

/// Delete the caixa with `key`.
///
/// # Errors
/// Returns [Error::NotFound] if no caixa has the key `key`, or
/// [Error::CaixaInUse] if any transaction was posted against it or transferred to it.
pub fn delete_caixa(key: &str, connection: &Connection) -> Result<(), Error> {
    let caixa = get_caixa_by_key(key, connection)?;

    let references: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE caixa_id = ?1 OR transfer_to_id = ?1",
        [caixa.id],
        |row| row.get(0),
    )?;
    if references > 0 {
        return Err(Error::CaixaInUse);
    }

    connection.execute("DELETE FROM caixa WHERE id = ?1", [caixa.id])?;

    Ok(())
}

#[cfg(test)]
mod derive_key_tests {
    use super::derive_caixa_key;

    #[test]
    fn folds_accents_and_drops_spaces() {
        assert_eq!(derive_caixa_key("Escola Bíblica"), "escolabiblica");
    }

    #[test]
    fn handles_cedilla_and_tilde() {
        assert_eq!(derive_caixa_key("Missões do Campo"), "missoesdocampo");
        assert_eq!(derive_caixa_key("Ação Social"), "acaosocial");
    }

    #[test]
    fn keeps_digits_and_drops_punctuation() {
        assert_eq!(derive_caixa_key("Obra #2 (Sede)!"), "obra2sede");
    }

    #[test]
    fn uppercase_accents_are_folded() {
        assert_eq!(derive_caixa_key("ÁGUA"), "agua");
    }
}
