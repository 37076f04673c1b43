//! CredentialGateway - scoped, bounded access to the identity store.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::config::DatabaseConfig;
use crate::domain::identity::{Credential, IdentityRecord};
use crate::ports::{IdentityConnection, IdentityConnector, StoreError};

/// Bounded exponential backoff for connections refused while the store starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total connection attempts, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before attempt `attempt + 1`, doubling from the initial backoff.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        }
    }
}

/// Outcome of a successful round trip to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Match(IdentityRecord),
    NoMatch,
}

/// Verifies credentials over a connection scoped to each call.
pub struct CredentialGateway {
    connector: Arc<dyn IdentityConnector>,
    retry: RetryPolicy,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl CredentialGateway {
    pub fn new(connector: Arc<dyn IdentityConnector>) -> Self {
        Self {
            connector,
            retry: RetryPolicy::default(),
            connect_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(5),
        }
    }

    /// Gateway with retry and timeouts taken from the database section.
    pub fn from_config(connector: Arc<dyn IdentityConnector>, config: &DatabaseConfig) -> Self {
        Self::new(connector)
            .with_retry(RetryPolicy {
                max_attempts: config.max_connect_attempts,
                initial_backoff: config.initial_backoff(),
                max_backoff: config.max_backoff(),
            })
            .with_timeouts(config.connect_timeout(), config.query_timeout())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, query: Duration) -> Self {
        self.connect_timeout = connect;
        self.query_timeout = query;
        self
    }

    /// Runs one lookup for `credential`.
    ///
    /// The connection is released before this returns on every path. If the
    /// future is dropped mid-flight the connection is released by its `Drop`.
    pub async fn verify(&self, credential: &Credential) -> Result<Verification, StoreError> {
        let mut connection = self.acquire().await?;

        let lookup = match timeout(self.query_timeout, connection.find_identity(credential)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.query_timeout)),
        };

        if let Err(e) = connection.release().await {
            tracing::warn!(error = %e, "identity store connection did not close cleanly");
        }

        match lookup? {
            Some(record) => Ok(Verification::Match(record)),
            None => Ok(Verification::NoMatch),
        }
    }

    async fn acquire(&self) -> Result<Box<dyn IdentityConnection>, StoreError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = match timeout(self.connect_timeout, self.connector.connect()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout(self.connect_timeout)),
            };

            match result {
                Ok(connection) => return Ok(connection),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.backoff_after(attempt);
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "identity store not ready, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
