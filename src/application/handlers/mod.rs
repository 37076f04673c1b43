//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod auth;
pub mod submission;

pub use auth::{AuthenticateHandler, CredentialGateway, LoginCommand, RetryPolicy, Verification};
pub use submission::{SubmitError, SubmitHandler};
