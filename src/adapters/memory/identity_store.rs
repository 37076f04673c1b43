//! In-memory identity store with connection accounting.
//!
//! # Example
//!
//! ```ignore
//! let connector = InMemoryIdentityConnector::new(PasswordScheme::Plaintext)
//!     .with_account("admin", "secret", IdentityRecord::default());
//! let gateway = CredentialGateway::new(Arc::new(connector));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::identity::{Credential, IdentityRecord, PasswordScheme};
use crate::ports::{IdentityConnection, IdentityConnector, StoreError};

/// Counts connections opened, connections released and lookups run.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    connect_calls: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
    lookups: AtomicUsize,
}

impl ConnectionStats {
    /// Calls to `connect`, successful or not.
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct Account {
    username: String,
    stored_password: String,
    record: IdentityRecord,
}

/// Identity store backed by a fixed account list.
#[derive(Debug, Clone)]
pub struct InMemoryIdentityConnector {
    accounts: Arc<Vec<Account>>,
    scheme: PasswordScheme,
    stats: Arc<ConnectionStats>,
    unavailable: Option<StoreError>,
}

impl InMemoryIdentityConnector {
    pub fn new(scheme: PasswordScheme) -> Self {
        Self {
            accounts: Arc::new(Vec::new()),
            scheme,
            stats: Arc::new(ConnectionStats::default()),
            unavailable: None,
        }
    }

    /// Adds an account. `stored_password` is interpreted under the scheme.
    ///
    /// The record gets `username` filled in if it does not carry one.
    pub fn with_account(
        mut self,
        username: impl Into<String>,
        stored_password: impl Into<String>,
        record: IdentityRecord,
    ) -> Self {
        let username = username.into();
        let mut columns = match record.into_value() {
            Value::Object(columns) => columns,
            _ => Default::default(),
        };
        columns
            .entry("username")
            .or_insert_with(|| Value::String(username.clone()));

        Arc::make_mut(&mut self.accounts).push(Account {
            username,
            stored_password: stored_password.into(),
            record: IdentityRecord::new(columns),
        });
        self
    }

    /// Every `connect` fails with `error`.
    pub fn unavailable(mut self, error: StoreError) -> Self {
        self.unavailable = Some(error);
        self
    }

    /// Shared usage counters.
    pub fn stats(&self) -> Arc<ConnectionStats> {
        self.stats.clone()
    }
}

#[async_trait]
impl IdentityConnector for InMemoryIdentityConnector {
    async fn connect(&self) -> Result<Box<dyn IdentityConnection>, StoreError> {
        self.stats.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.unavailable {
            return Err(error.clone());
        }

        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryIdentityConnection {
            accounts: self.accounts.clone(),
            scheme: self.scheme,
            stats: self.stats.clone(),
        }))
    }
}

struct InMemoryIdentityConnection {
    accounts: Arc<Vec<Account>>,
    scheme: PasswordScheme,
    stats: Arc<ConnectionStats>,
}

#[async_trait]
impl IdentityConnection for InMemoryIdentityConnection {
    async fn find_identity(
        &mut self,
        credential: &Credential,
    ) -> Result<Option<IdentityRecord>, StoreError> {
        self.stats.lookups.fetch_add(1, Ordering::SeqCst);

        let record = self
            .accounts
            .iter()
            .find(|account| {
                account.username == credential.username()
                    && self
                        .scheme
                        .matches(&account.stored_password, credential.expose_password())
            })
            .map(|account| account.record.clone());

        Ok(record)
    }

    async fn release(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

impl Drop for InMemoryIdentityConnection {
    fn drop(&mut self) {
        self.stats.released.fetch_add(1, Ordering::SeqCst);
    }
}
