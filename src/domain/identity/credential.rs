//! Credential and identity record value objects.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Rejection raised before any store access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("username and password are required")]
    MissingFields,
}

/// Username/password pair submitted for verification.
///
/// The username is non-blank and the password non-empty by construction.
/// The password is held as a secret so `Debug` output and logs never
/// contain it.
#[derive(Debug)]
pub struct Credential {
    username: String,
    password: SecretString,
}

impl Credential {
    /// Builds a credential, rejecting missing fields.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        Self::from_parts(Some(username.into()), Some(password.into()))
    }

    /// Builds a credential from possibly-absent request fields.
    pub fn from_parts(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, CredentialError> {
        let username = username
            .filter(|u| !u.trim().is_empty())
            .ok_or(CredentialError::MissingFields)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(CredentialError::MissingFields)?;

        Ok(Self {
            username,
            password: SecretString::new(password),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Plain password, for binding into the lookup or hashing only.
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Opaque account row returned by the identity store.
///
/// The row's columns are carried as a JSON object. Its shape is not
/// interpreted beyond existence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityRecord(Map<String, Value>);

impl IdentityRecord {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Returns the record with `column` removed.
    pub fn without(mut self, column: &str) -> Self {
        self.0.remove(column);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl FromIterator<(String, Value)> for IdentityRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
