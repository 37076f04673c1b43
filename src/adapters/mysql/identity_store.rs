//! MySQL implementation of the identity store ports.
//!
//! Opens one unpooled connection per verification attempt and runs a single
//! bound, limit-one lookup against the configured account table.

use std::io::ErrorKind;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Number, Value};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use subtle::ConstantTimeEq;

use crate::config::{AuthConfig, DatabaseConfig, ValidationError};
use crate::domain::identity::{Credential, IdentityRecord, PasswordScheme};
use crate::ports::{IdentityConnection, IdentityConnector, StoreError};

/// Opens connections to the MySQL account store.
#[derive(Clone)]
pub struct MySqlIdentityConnector {
    options: MySqlConnectOptions,
    lookup: LookupQuery,
}

impl MySqlIdentityConnector {
    /// Builds a connector from the database and auth sections.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIdentifier` if a table or column name
    /// is not a plain identifier.
    pub fn new(database: &DatabaseConfig, auth: &AuthConfig) -> Result<Self, ValidationError> {
        auth.validate()?;

        let options = MySqlConnectOptions::new()
            .host(&database.host)
            .port(database.port)
            .username(&database.user)
            .password(&database.password)
            .database(&database.database);

        Ok(Self {
            options,
            lookup: LookupQuery::new(auth),
        })
    }
}

#[async_trait]
impl IdentityConnector for MySqlIdentityConnector {
    async fn connect(&self) -> Result<Box<dyn IdentityConnection>, StoreError> {
        let conn = self.options.connect().await.map_err(classify_connect_error)?;
        Ok(Box::new(MySqlIdentityConnection {
            conn,
            lookup: self.lookup.clone(),
        }))
    }
}

struct MySqlIdentityConnection {
    conn: MySqlConnection,
    lookup: LookupQuery,
}

#[async_trait]
impl IdentityConnection for MySqlIdentityConnection {
    async fn find_identity(
        &mut self,
        credential: &Credential,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        let query = sqlx::query(&self.lookup.sql).bind(credential.username());
        let query = match self.lookup.scheme {
            PasswordScheme::Plaintext => query.bind(credential.expose_password()),
            PasswordScheme::SaltedSha256 => query,
        };

        let row = query
            .fetch_optional(&mut self.conn)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored_username = text_column(&row, &self.lookup.username_column)?;
        let stored_password = text_column(&row, &self.lookup.password_column)?;
        if !self.lookup.verify_row(
            stored_username.as_deref(),
            stored_password.as_deref(),
            credential,
        ) {
            return Ok(None);
        }

        Ok(Some(
            row_to_record(&row).without(&self.lookup.password_column),
        ))
    }

    async fn release(self: Box<Self>) -> Result<(), StoreError> {
        self.conn
            .close()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

/// Lookup statement text and how to bind it.
#[derive(Debug, Clone)]
struct LookupQuery {
    sql: String,
    scheme: PasswordScheme,
    username_column: String,
    password_column: String,
}

impl LookupQuery {
    fn new(auth: &AuthConfig) -> Self {
        let sql = match auth.password_scheme {
            PasswordScheme::Plaintext => format!(
                "SELECT * FROM `{}` WHERE `{}` = ? AND `{}` = ? LIMIT 1",
                auth.identity_table, auth.username_column, auth.password_column
            ),
            PasswordScheme::SaltedSha256 => format!(
                "SELECT * FROM `{}` WHERE `{}` = ? LIMIT 1",
                auth.identity_table, auth.username_column
            ),
        };
        Self {
            sql,
            scheme: auth.password_scheme,
            username_column: auth.username_column.clone(),
            password_column: auth.password_column.clone(),
        }
    }

    /// Byte-exact check of the matched row.
    ///
    /// Column collations may fold case or pad trailing spaces, so a row the
    /// server returns is only accepted if both stored values match exactly.
    fn verify_row(
        &self,
        stored_username: Option<&str>,
        stored_password: Option<&str>,
        credential: &Credential,
    ) -> bool {
        let username_matches = stored_username
            .map(|stored| {
                bool::from(stored.as_bytes().ct_eq(credential.username().as_bytes()))
            })
            .unwrap_or(false);
        let password_matches = stored_password
            .map(|stored| self.scheme.matches(stored, credential.expose_password()))
            .unwrap_or(false);
        username_matches & password_matches
    }
}

/// Reads a character or binary column as text. Non-UTF-8 bytes read as `None`.
fn text_column(row: &MySqlRow, column: &str) -> Result<Option<String>, StoreError> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => row
            .try_get::<Option<Vec<u8>>, _>(column)
            .map(|bytes| bytes.and_then(|b| String::from_utf8(b).ok()))
            .map_err(|e| StoreError::Query(e.to_string())),
        Err(e) => Err(StoreError::Query(e.to_string())),
    }
}

/// Refused or dropped sockets mean the server is still starting.
fn classify_connect_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Io(io)
            if matches!(
                io.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::NotConnected
                    | ErrorKind::UnexpectedEof
            ) =>
        {
            StoreError::NotReady(err.to_string())
        }
        _ => StoreError::Unavailable(err.to_string()),
    }
}

fn row_to_record(row: &MySqlRow) -> IdentityRecord {
    let mut columns = Map::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name());
        columns.insert(column.name().to_string(), value);
    }
    IdentityRecord::new(columns)
}

/// Best-effort JSON rendering of one column. Undecodable values become null.
fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Err(_) => return Value::Null,
        Ok(_) => {}
    }

    let decoded = match type_name {
        "BOOLEAN" => row.try_get::<bool, _>(index).map(Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(index).map(Value::from)
        }
        "YEAR" => row.try_get_unchecked::<u16, _>(index).map(Value::from),
        name if name.ends_with("UNSIGNED") => row.try_get::<u64, _>(index).map(Value::from),
        "FLOAT" => row
            .try_get::<f32, _>(index)
            .map(|f| float_value(f64::from(f))),
        "DOUBLE" => row.try_get::<f64, _>(index).map(float_value),
        "DECIMAL" => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String),
        "DATETIME" => row
            .try_get::<NaiveDateTime, _>(index)
            .map(|dt| Value::String(dt.to_string())),
        "TIMESTAMP" => row
            .try_get::<DateTime<Utc>, _>(index)
            .map(|dt| Value::String(dt.to_rfc3339())),
        "DATE" => row
            .try_get::<NaiveDate, _>(index)
            .map(|d| Value::String(d.to_string())),
        "TIME" => row
            .try_get::<NaiveTime, _>(index)
            .map(|t| Value::String(t.to_string())),
        "JSON" => row
            .try_get_unchecked::<String, _>(index)
            .map(|s| serde_json::from_str(&s).unwrap_or(Value::String(s))),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => row
            .try_get::<Vec<u8>, _>(index)
            .map(bytes_value),
        _ => row.try_get::<String, _>(index).map(Value::String),
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(column = index, type_name, error = %e, "column left undecoded");
        Value::Null
    })
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map_or(Value::Null, Value::Number)
}

fn bytes_value(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(text) => Value::String(text),
        Err(e) => Value::String(hex::encode(e.into_bytes())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::SaltedDigest;
    use std::io;

    #[test]
    fn plaintext_lookup_binds_both_fields() {
        let query = LookupQuery::new(&AuthConfig::default());
        assert_eq!(
            query.sql,
            "SELECT * FROM `usuarios` WHERE `username` = ? AND `password` = ? LIMIT 1"
        );
        assert_eq!(query.sql.matches('?').count(), 2);
    }

    #[test]
    fn salted_lookup_binds_username_only() {
        let auth = AuthConfig {
            password_scheme: PasswordScheme::SaltedSha256,
            identity_table: "accounts".to_string(),
            username_column: "login".to_string(),
            password_column: "pw_hash".to_string(),
        };
        let query = LookupQuery::new(&auth);
        assert_eq!(query.sql, "SELECT * FROM `accounts` WHERE `login` = ? LIMIT 1");
        assert_eq!(query.password_column, "pw_hash");
    }

    #[test]
    fn row_check_rejects_collation_matches() {
        let query = LookupQuery::new(&AuthConfig::default());
        let stored = (Some("admin"), Some("s3cret!"));

        let exact = Credential::new("admin", "s3cret!").unwrap();
        assert!(query.verify_row(stored.0, stored.1, &exact));

        for (username, password) in [
            ("ADMIN", "s3cret!"),
            ("Admin", "s3cret!"),
            ("admin", "S3CRET!"),
            ("admin", "s3cret! "),
            ("admin ", "s3cret!"),
        ] {
            let candidate = Credential::new(username, password).unwrap();
            assert!(
                !query.verify_row(stored.0, stored.1, &candidate),
                "{username:?}/{password:?} accepted"
            );
        }
    }

    #[test]
    fn row_check_rejects_null_columns() {
        let query = LookupQuery::new(&AuthConfig::default());
        let candidate = Credential::new("admin", "s3cret!").unwrap();
        assert!(!query.verify_row(None, Some("s3cret!"), &candidate));
        assert!(!query.verify_row(Some("admin"), None, &candidate));
    }

    #[test]
    fn row_check_verifies_salted_digest() {
        let auth = AuthConfig {
            password_scheme: PasswordScheme::SaltedSha256,
            ..Default::default()
        };
        let query = LookupQuery::new(&auth);
        let stored = SaltedDigest::compute(b"pepper", "s3cret!").encode();

        let candidate = Credential::new("admin", "s3cret!").unwrap();
        assert!(query.verify_row(Some("admin"), Some(&stored), &candidate));

        let candidate = Credential::new("admin", "S3cret!").unwrap();
        assert!(!query.verify_row(Some("admin"), Some(&stored), &candidate));
    }

    #[test]
    fn connector_rejects_bad_identifiers() {
        let auth = AuthConfig {
            identity_table: "usuarios; --".to_string(),
            ..Default::default()
        };
        let result = MySqlIdentityConnector::new(&DatabaseConfig::default(), &auth);
        assert!(matches!(result, Err(ValidationError::InvalidIdentifier { .. })));
    }

    #[test]
    fn refused_connection_is_not_ready() {
        let err = sqlx::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(classify_connect_error(err).is_transient());
    }

    #[test]
    fn other_connect_failures_are_unavailable() {
        let err = sqlx::Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(classify_connect_error(err), StoreError::Unavailable(_)));

        let err = sqlx::Error::Protocol("bad handshake".to_string());
        assert!(matches!(classify_connect_error(err), StoreError::Unavailable(_)));
    }

    #[test]
    fn binary_columns_render_as_text_or_hex() {
        assert_eq!(bytes_value(b"abc".to_vec()), Value::String("abc".into()));
        assert_eq!(bytes_value(vec![0xff, 0x00]), Value::String("ff00".into()));
    }

    #[test]
    fn non_finite_floats_become_null() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(1.5), serde_json::json!(1.5));
    }
}
