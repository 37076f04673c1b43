//! Identity store port - scoped connections to the relational account store.
//!
//! A connection is opened per verification attempt and released before the
//! attempt completes. Nothing is pooled or shared across requests.
//!
//! # Contract
//!
//! Implementations must:
//! - Run exactly one parameterized, limit-one lookup per `find_identity` call
//! - Bind the submitted values, never interpolate them into SQL
//! - Release the underlying connection both in `release` and when dropped
//! - Report connection establishment races (store still starting) as
//!   [`StoreError::NotReady`] so the gateway can retry them

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::identity::{Credential, IdentityRecord};

/// Failures reaching or querying the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store is not accepting connections yet.
    #[error("identity store not ready: {0}")]
    NotReady(String),

    /// Connection could not be established (auth failure, DNS, TLS...).
    #[error("identity store unavailable: {0}")]
    Unavailable(String),

    /// Connected, but the lookup failed.
    #[error("identity lookup failed: {0}")]
    Query(String),

    /// Operation exceeded its deadline.
    #[error("identity store timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Whether retrying the connection may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}

/// Opens connections to the identity store.
#[async_trait]
pub trait IdentityConnector: Send + Sync {
    /// Establishes a fresh connection owned by the caller.
    async fn connect(&self) -> Result<Box<dyn IdentityConnection>, StoreError>;
}

/// One open connection to the identity store.
#[async_trait]
pub trait IdentityConnection: Send {
    /// Looks up the single identity matching the credential.
    ///
    /// Returns `Ok(None)` when nothing matches; a wrong username and a wrong
    /// password are indistinguishable.
    async fn find_identity(
        &mut self,
        credential: &Credential,
    ) -> Result<Option<IdentityRecord>, StoreError>;

    /// Closes the connection gracefully.
    async fn release(self: Box<Self>) -> Result<(), StoreError>;
}
