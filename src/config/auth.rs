//! Credential lookup configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::identity::PasswordScheme;

/// Where identities live and how stored passwords are compared.
///
/// Table and column names end up inside SQL text (identifiers cannot be
/// bound), so they are restricted to plain identifiers.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// How stored password values are compared against candidates
    #[serde(default)]
    pub password_scheme: PasswordScheme,

    /// Table holding one row per account
    #[serde(default = "default_identity_table")]
    pub identity_table: String,

    /// Column matched against the submitted username
    #[serde(default = "default_username_column")]
    pub username_column: String,

    /// Column holding the stored password value
    #[serde(default = "default_password_column")]
    pub password_column: String,
}

impl AuthConfig {
    /// Validate credential lookup configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identifier("AUTH__IDENTITY_TABLE", &self.identity_table)?;
        check_identifier("AUTH__USERNAME_COLUMN", &self.username_column)?;
        check_identifier("AUTH__PASSWORD_COLUMN", &self.password_column)?;
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_scheme: PasswordScheme::default(),
            identity_table: default_identity_table(),
            username_column: default_username_column(),
            password_column: default_password_column(),
        }
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_sql_identifier(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

fn default_identity_table() -> String {
    "usuarios".to_string()
}

fn default_username_column() -> String {
    "username".to_string()
}

fn default_password_column() -> String {
    "password".to_string()
}
