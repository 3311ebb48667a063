//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,

    /// The bearer token required for user management, if any.
    pub admin_token: Option<String>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        password_cost: u32,
        admin_token: Option<String>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            password_cost,
            admin_token,
        })
    }
}
