//! Storage Adapters
//!
//! Implementations of the SubmissionStore port backed by the filesystem.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::LocalSubmissionStore;
//!
//! let store = LocalSubmissionStore::new("./data/uploads");
//! ```

mod local_submission_store;

pub use local_submission_store::LocalSubmissionStore;
