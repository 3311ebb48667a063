//! Password strength checks and bcrypt hashing for dashboard users.
//!
//! A raw password only reaches the database as a [PasswordHash], and the only
//! way to hash one is through a [ValidatedPassword].

use std::fmt;

use bcrypt::BcryptError;
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// The weakest zxcvbn score accepted for a new password.
const MIN_SCORE: Score = Score::Three;

const TOO_WEAK_HINT: &str = "use uma frase mais longa, com palavras pouco comuns";

/// A raw password that passed the strength check.
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] with the estimator's suggestions when the
    /// password scores below three out of four.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        if entropy.score() >= MIN_SCORE {
            return Ok(Self(raw_password.to_owned()));
        }

        let hint = entropy
            .feedback()
            .map(|feedback| feedback.to_string())
            .filter(|hint| !hint.trim().is_empty())
            .unwrap_or_else(|| TOO_WEAK_HINT.to_owned());

        Err(Error::TooWeak(hint))
    }
}

impl fmt::Debug for ValidatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidatedPassword(********)")
    }
}

/// The salted bcrypt hash stored in the `user` table.
///
/// Not `Serialize`, so it cannot leak into a response body.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The cost used by the command line tools and the server's default.
    pub const DEFAULT_COST: u32 = 12;

    /// Hash `password` with the given bcrypt `cost`.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if bcrypt rejects the cost.
    pub fn hash(password: &ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Check the strength of `raw_password` and hash it.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] or [Error::HashingError].
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::hash(&ValidatedPassword::new(raw_password)?, cost)
    }

    /// A hash as read back from the database.
    pub fn from_stored(stored_hash: &str) -> Self {
        Self(stored_hash.to_owned())
    }

    /// Whether `raw_password` is the password this hash was made from.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{PasswordHash, ValidatedPassword};

    #[test]
    fn rejects_short_and_common_passwords() {
        for password in ["", "admin123", "password1234", "qwerty123"] {
            assert!(
                matches!(ValidatedPassword::new(password), Err(Error::TooWeak(_))),
                "{password:?} should be too weak"
            );
        }
    }

    #[test]
    fn too_weak_always_has_a_hint() {
        let Err(Error::TooWeak(hint)) = ValidatedPassword::new("") else {
            panic!("empty password should be too weak");
        };

        assert!(!hint.trim().is_empty());
    }

    #[test]
    fn accepts_long_passphrase() {
        assert!(ValidatedPassword::new("dizimos e ofertas do mes de setembro").is_ok());
    }

    #[test]
    fn debug_hides_password() {
        let password = ValidatedPassword::new("dizimos e ofertas do mes de setembro").unwrap();

        assert_eq!(format!("{password:?}"), "ValidatedPassword(********)");
    }

    #[test]
    fn hash_verifies_only_its_password() {
        let hash = PasswordHash::from_raw_password("tesouraria da igreja central", 4).unwrap();

        assert!(hash.verify("tesouraria da igreja central").unwrap());
        assert!(!hash.verify("tesouraria da igreja").unwrap());
    }

    #[test]
    fn same_password_is_salted_differently() {
        let password = ValidatedPassword::new("tesouraria da igreja central").unwrap();

        assert_ne!(
            PasswordHash::hash(&password, 4).unwrap(),
            PasswordHash::hash(&password, 4).unwrap()
        );
    }

    #[test]
    fn invalid_cost_is_a_hashing_error() {
        let password = ValidatedPassword::new("tesouraria da igreja central").unwrap();

        assert!(matches!(
            PasswordHash::hash(&password, 99),
            Err(Error::HashingError(_))
        ));
    }

    #[test]
    fn malformed_stored_hash_fails_to_verify() {
        assert!(PasswordHash::from_stored("x").verify("qualquer").is_err());
    }
}
