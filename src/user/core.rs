//! The user model and its database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to do in the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages users, caixas and the church profile.
    Admin,
    /// The treasurer, posts transactions and issues receipts.
    Tesoureiro,
    /// The secretary.
    Secretario,
}

impl Role {
    /// The role as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tesoureiro => "tesoureiro",
            Role::Secretario => "secretario",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "tesoureiro" => Ok(Role::Tesoureiro),
            "secretario" => Ok(Role::Secretario),
            other => Err(Error::InvalidRole(other.to_owned())),
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A user of the dashboard.
///
/// The password hash is intentionally not part of this type so that it can
/// be serialized into responses as is. Use [get_credentials] to get the hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The unique name used to log in.
    pub username: String,
    /// The display name.
    pub name: String,
    /// What the user is allowed to do.
    pub role: Role,
}

/// The data needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The unique name used to log in.
    pub username: String,
    /// The display name.
    pub name: String,
    /// The salted hash of the user's password.
    pub password_hash: PasswordHash,
    /// What the user is allowed to do.
    pub role: Role,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password TEXT NOT NULL,
                role TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a row of `id, username, name, role` starting at `offset` to a [User].
pub fn map_user_row_with_offset(row: &Row, offset: usize) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserId::new(row.get(offset)?),
        username: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        role: row.get(offset + 3)?,
    })
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    map_user_row_with_offset(row, 0)
}

fn map_unique_username_error(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateUsername,
        error => error.into(),
    }
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns [Error::DuplicateUsername] if the username is taken, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (username, name, password, role) VALUES (?1, ?2, ?3, ?4)",
            (
                &new_user.username,
                &new_user.name,
                new_user.password_hash.as_ref(),
                new_user.role,
            ),
        )
        .map_err(map_unique_username_error)?;

    Ok(User {
        id: UserId::new(connection.last_insert_rowid()),
        username: new_user.username,
        name: new_user.name,
        role: new_user.role,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, name, role FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Usuário"),
            error => error.into(),
        })
}

/// Get the user whose username is exactly `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, name, role FROM user WHERE username = :username")?
        .query_row(&[(":username", &username)], map_user_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Usuário"),
            error => error.into(),
        })
}

/// Get a user together with their password hash, for checking credentials.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such user.
pub fn get_credentials(
    username: &str,
    connection: &Connection,
) -> Result<(User, PasswordHash), Error> {
    connection
        .prepare(
            "SELECT id, username, name, role, password FROM user WHERE username = :username",
        )?
        .query_row(&[(":username", &username)], |row| {
            let user = map_user_row(row)?;
            let raw_password_hash: String = row.get(4)?;

            Ok((user, PasswordHash::from_stored(&raw_password_hash)))
        })
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound("Usuário"),
            error => error.into(),
        })
}

/// Get every user ordered by ID.
pub fn list_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare("SELECT id, username, name, role FROM user ORDER BY id ASC")?
        .query_map([], map_user_row)?
        .map(|user_result| user_result.map_err(Error::from))
        .collect()
}

/// Overwrite the username, name and role of the user with `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist or
/// [Error::DuplicateUsername] if the new username is taken.
pub fn update_user(
    id: UserId,
    username: &str,
    name: &str,
    role: Role,
    connection: &Connection,
) -> Result<User, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE user SET username = ?1, name = ?2, role = ?3 WHERE id = ?4",
            (username, name, role, id.as_i64()),
        )
        .map_err(map_unique_username_error)?;

    if rows_affected == 0 {
        return Err(Error::NotFound("Usuário"));
    }

    Ok(User {
        id,
        username: username.to_owned(),
        name: name.to_owned(),
        role,
    })
}

/// Replace the password hash of the user with `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn update_password(
    id: UserId,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), id.as_i64()),
    )?;

    match rows_affected {
        0 => Err(Error::NotFound("Usuário")),
        _ => Ok(()),
    }
}

/// Count the transactions and receipts that were recorded by the user.
pub fn count_user_references(id: UserId, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(
            "SELECT
                (SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1)
              + (SELECT COUNT(id) FROM receipt WHERE user_id = ?1)",
            [id.as_i64()],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Delete the user with `id`.
///
/// # Errors
///
/// Returns [Error::UserInUse] if the user recorded any transaction or receipt,
/// or [Error::NotFound] if the user does not exist.
pub fn delete_user(id: UserId, connection: &Connection) -> Result<(), Error> {
    if count_user_references(id, connection)? > 0 {
        return Err(Error::UserInUse);
    }

    let rows_affected = connection.execute("DELETE FROM user WHERE id = ?1", [id.as_i64()])?;

    match rows_affected {
        0 => Err(Error::NotFound("Usuário")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        db::initialize,
        user::core::{
            NewUser, Role, UserId, count_user_references, create_user, delete_user,
            get_credentials, get_user_by_id, get_user_by_username, list_users, update_user,
        },
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        conn
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_owned(),
            name: "Tesoureiro".to_owned(),
            password_hash: PasswordHash::from_stored("hunter2"),
            role: Role::Tesoureiro,
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let conn = get_db_connection();

        let inserted_user = create_user(new_user("tesoureiro"), &conn).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username, "tesoureiro");
        assert_eq!(inserted_user.role, Role::Tesoureiro);
    }

    #[test]
    fn insert_duplicate_username_fails() {
        let conn = get_db_connection();
        create_user(new_user("tesoureiro"), &conn).unwrap();

        let result = create_user(new_user("tesoureiro"), &conn);

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let conn = get_db_connection();

        assert_eq!(
            get_user_by_id(UserId::new(42), &conn),
            Err(Error::NotFound("Usuário"))
        );
    }

    #[test]
    fn get_user_by_username_is_exact_match() {
        let conn = get_db_connection();
        let want = create_user(new_user("tesoureiro"), &conn).unwrap();

        assert_eq!(get_user_by_username("tesoureiro", &conn), Ok(want));
        assert_eq!(
            get_user_by_username("Tesoureiro", &conn),
            Err(Error::NotFound("Usuário"))
        );
    }

    #[test]
    fn get_credentials_returns_hash() {
        let conn = get_db_connection();
        let want_user = create_user(new_user("tesoureiro"), &conn).unwrap();

        let (user, hash) = get_credentials("tesoureiro", &conn).unwrap();

        assert_eq!(user, want_user);
        assert_eq!(hash, PasswordHash::from_stored("hunter2"));
    }

    #[test]
    fn list_users_is_ordered_by_id() {
        let conn = get_db_connection();
        let first = create_user(new_user("b"), &conn).unwrap();
        let second = create_user(new_user("a"), &conn).unwrap();

        assert_eq!(list_users(&conn), Ok(vec![first, second]));
    }

    #[test]
    fn update_missing_user_fails() {
        let conn = get_db_connection();

        let result = update_user(UserId::new(9), "x", "X", Role::Admin, &conn);

        assert_eq!(result, Err(Error::NotFound("Usuário")));
    }

    #[test]
    fn update_to_taken_username_fails() {
        let conn = get_db_connection();
        create_user(new_user("admin"), &conn).unwrap();
        let user = create_user(new_user("tesoureiro"), &conn).unwrap();

        let result = update_user(user.id, "admin", "Admin", Role::Admin, &conn);

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn delete_user_without_references_succeeds() {
        let conn = get_db_connection();
        let user = create_user(new_user("tesoureiro"), &conn).unwrap();

        assert_eq!(count_user_references(user.id, &conn), Ok(0));
        assert_eq!(delete_user(user.id, &conn), Ok(()));
        assert_eq!(
            get_user_by_id(user.id, &conn),
            Err(Error::NotFound("Usuário"))
        );
    }

    #[test]
    fn delete_missing_user_fails() {
        let conn = get_db_connection();

        assert_eq!(
            delete_user(UserId::new(3), &conn),
            Err(Error::NotFound("Usuário"))
        );
    }
}
