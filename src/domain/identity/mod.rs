//! Identity module - credentials, stored-password schemes, login outcomes.
//!
//! Nothing here performs I/O. The identity store is reached through the
//! `IdentityConnector` port.

mod credential;
mod outcome;
mod password;

pub use credential::{Credential, CredentialError, IdentityRecord};
pub use outcome::AuthOutcome;
pub use password::{PasswordScheme, SaltedDigest};
