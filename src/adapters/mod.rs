//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum routes, multipart decoding and the response envelope
//! - `memory` - in-memory identity and submission stores
//! - `mysql` - MySQL identity store
//! - `storage` - filesystem submission store

pub mod http;
pub mod memory;
pub mod mysql;
pub mod storage;

pub use memory::{ConnectionStats, InMemoryIdentityConnector, InMemorySubmissionStore};
pub use mysql::MySqlIdentityConnector;
pub use storage::LocalSubmissionStore;
