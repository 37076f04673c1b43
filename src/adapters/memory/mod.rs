//! In-memory adapters for development and tests.
//!
//! Neither adapter touches the network or the filesystem. Both expose
//! counters so tests can assert on how the ports were used.

mod identity_store;
mod submission_store;

pub use identity_store::{ConnectionStats, InMemoryIdentityConnector};
pub use submission_store::InMemorySubmissionStore;
