//! Identity store (MySQL) configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Connection parameters for the identity store.
///
/// Only the identity-store adapter reads this section.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Server host name
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login user
    #[serde(default = "default_user")]
    pub user: String,

    /// Login password
    #[serde(default = "default_password")]
    pub password: String,

    /// Database (schema) name
    #[serde(default = "default_database")]
    pub database: String,

    /// Connection establishment timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Lookup query timeout in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    /// Attempts made while the store reports it is not ready yet
    #[serde(default = "default_max_connect_attempts")]
    pub max_connect_attempts: u32,

    /// First retry delay in milliseconds, doubled per attempt
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound for the retry delay in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

impl DatabaseConfig {
    /// Get connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get query timeout as Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Get initial backoff as Duration
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Get max backoff as Duration
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__HOST"));
        }
        if self.user.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__USER"));
        }
        if self.database.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__DATABASE"));
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.connect_timeout_secs == 0 || self.query_timeout_secs == 0 {
            return Err(ValidationError::InvalidDatabaseTimeout);
        }
        if self.max_connect_attempts == 0 {
            return Err(ValidationError::InvalidRetryAttempts);
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(ValidationError::InvalidBackoff);
        }
        Ok(())
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("query_timeout_secs", &self.query_timeout_secs)
            .field("max_connect_attempts", &self.max_connect_attempts)
            .finish_non_exhaustive()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: default_password(),
            database: default_database(),
            connect_timeout_secs: default_connect_timeout(),
            query_timeout_secs: default_query_timeout(),
            max_connect_attempts: default_max_connect_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

fn default_host() -> String {
    "db".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_password() -> String {
    "root".to_string()
}

fn default_database() -> String {
    "intranet".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_query_timeout() -> u64 {
    5
}

fn default_max_connect_attempts() -> u32 {
    5
}

fn default_initial_backoff() -> u64 {
    200
}

fn default_max_backoff() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.host, "db");
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "root");
        assert_eq!(config.database, "intranet");
        assert_eq!(config.max_connect_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_durations() {
        let config = DatabaseConfig {
            connect_timeout_secs: 3,
            query_timeout_secs: 7,
            initial_backoff_ms: 50,
            max_backoff_ms: 400,
            ..Default::default()
        };
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.query_timeout(), Duration::from_secs(7));
        assert_eq!(config.initial_backoff(), Duration::from_millis(50));
        assert_eq!(config.max_backoff(), Duration::from_millis(400));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_validation_missing_host() {
        let config = DatabaseConfig {
            host: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_attempts() {
        let config = DatabaseConfig {
            max_connect_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetryAttempts)
        ));
    }

    #[test]
    fn test_validation_backoff_order() {
        let config = DatabaseConfig {
            initial_backoff_ms: 5000,
            max_backoff_ms: 100,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidBackoff)));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = DatabaseConfig {
            query_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
