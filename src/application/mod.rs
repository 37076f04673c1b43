//! Application layer - command handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! It knows nothing about HTTP or SQL.

pub mod handlers;

pub use handlers::{
    AuthenticateHandler, CredentialGateway, LoginCommand, RetryPolicy, SubmitError,
    SubmitHandler, Verification,
};
