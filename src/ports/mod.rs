//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `IdentityConnector` / `IdentityConnection` - scoped access to the account store
//! - `SubmissionStore` - persistence for accepted submissions

mod identity_store;
mod submission_store;

pub use identity_store::{IdentityConnection, IdentityConnector, StoreError};
pub use submission_store::{
    sanitize_file_name, StorageError, StoredFile, StoredSubmission, SubmissionStore,
};
