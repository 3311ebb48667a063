//! References to caixas and users as sent by the dashboard.
//!
//! The dashboard may refer to a caixa either by its id (`caixaId`) or by its key
//! (`caixa`), and to a user either by id (`userId`) or by username (`user`).
//! These are parsed once at the API boundary into [CaixaRef] and [UserRef] and
//! resolved to database rows before any business logic runs.

use rusqlite::Connection;

use crate::{
    Error,
    caixa::{Caixa, get_caixa_by_id, get_caixa_by_key},
    database_id::CaixaId,
    user::{User, UserId, get_user_by_id, get_user_by_username},
};

/// A caixa referred to by id or by key.
#[derive(Debug, Clone, PartialEq)]
pub enum CaixaRef {
    /// The database id of the caixa.
    Id(CaixaId),
    /// The key derived from the caixa's name, e.g. "escolabiblica".
    Key(String),
}

impl CaixaRef {
    /// Build a reference from the two optional input fields.
    ///
    /// The id wins when both are present. Blank keys count as absent.
    pub fn from_input(id: Option<CaixaId>, key: Option<&str>) -> Option<Self> {
        match (id, key.map(str::trim)) {
            (Some(id), _) => Some(CaixaRef::Id(id)),
            (None, Some(key)) if !key.is_empty() => Some(CaixaRef::Key(key.to_owned())),
            _ => None,
        }
    }

    /// Look up the referenced caixa.
    ///
    /// # Errors
    /// Returns [Error::UnknownCaixa] if the caixa does not exist.
    pub fn resolve(&self, connection: &Connection) -> Result<Caixa, Error> {
        let result = match self {
            CaixaRef::Id(id) => get_caixa_by_id(*id, connection),
            CaixaRef::Key(key) => get_caixa_by_key(key, connection),
        };

        result.map_err(|error| match error {
            Error::NotFound(_) => Error::UnknownCaixa,
            error => error,
        })
    }
}

/// A user referred to by id or by username.
#[derive(Debug, Clone, PartialEq)]
pub enum UserRef {
    /// The database id of the user.
    Id(UserId),
    /// The username used to log in.
    Username(String),
}

impl UserRef {
    /// Build a reference from the two optional input fields.
    ///
    /// The id wins when both are present. Blank usernames count as absent.
    pub fn from_input(id: Option<i64>, username: Option<&str>) -> Option<Self> {
        match (id, username.map(str::trim)) {
            (Some(id), _) => Some(UserRef::Id(UserId::new(id))),
            (None, Some(username)) if !username.is_empty() => {
                Some(UserRef::Username(username.to_owned()))
            }
            _ => None,
        }
    }

    /// Look up the referenced user.
    ///
    /// # Errors
    /// Returns [Error::UnknownUser] if the user does not exist.
    pub fn resolve(&self, connection: &Connection) -> Result<User, Error> {
        let result = match self {
            UserRef::Id(id) => get_user_by_id(*id, connection),
            UserRef::Username(username) => get_user_by_username(username, connection),
        };

        result.map_err(|error| match error {
            Error::NotFound(_) => Error::UnknownUser,
            error => error,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        caixa::create_caixa,
        db::initialize,
        user::{NewUser, Role, UserId, create_user},
    };

    use super::{CaixaRef, UserRef};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn id_takes_precedence_over_key() {
        assert_eq!(
            CaixaRef::from_input(Some(3), Some("geral")),
            Some(CaixaRef::Id(3))
        );
        assert_eq!(
            UserRef::from_input(Some(2), Some("admin")),
            Some(UserRef::Id(UserId::new(2)))
        );
    }

    #[test]
    fn blank_key_is_absent() {
        assert_eq!(CaixaRef::from_input(None, Some("  ")), None);
        assert_eq!(UserRef::from_input(None, Some("")), None);
        assert_eq!(CaixaRef::from_input(None, None), None);
    }

    #[test]
    fn resolves_caixa_by_key_and_id() {
        let conn = get_test_connection();
        let caixa = create_caixa("Geral", &conn).unwrap();

        assert_eq!(
            CaixaRef::Key("geral".to_owned()).resolve(&conn),
            Ok(caixa.clone())
        );
        assert_eq!(CaixaRef::Id(caixa.id).resolve(&conn), Ok(caixa));
    }

    #[test]
    fn unknown_caixa_fails() {
        let conn = get_test_connection();

        assert_eq!(
            CaixaRef::Key("naoexiste".to_owned()).resolve(&conn),
            Err(Error::UnknownCaixa)
        );
        assert_eq!(CaixaRef::Id(99).resolve(&conn), Err(Error::UnknownCaixa));
    }

    #[test]
    fn resolves_user_by_username() {
        let conn = get_test_connection();
        let user = create_user(
            NewUser {
                username: "tesoureiro".to_owned(),
                name: "Tesoureiro".to_owned(),
                password_hash: PasswordHash::from_stored("x"),
                role: Role::Tesoureiro,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(
            UserRef::Username("tesoureiro".to_owned()).resolve(&conn),
            Ok(user)
        );
        assert_eq!(
            UserRef::Username("ninguem".to_owned()).resolve(&conn),
            Err(Error::UnknownUser)
        );
    }
}
