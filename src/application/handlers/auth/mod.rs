//! Authentication application handlers.
//!
//! The gateway owns the connection lifecycle; the handler classifies the
//! result into an [`AuthOutcome`](crate::domain::identity::AuthOutcome).

mod authenticate;
mod credential_gateway;

pub use authenticate::{AuthenticateHandler, LoginCommand};
pub use credential_gateway::{CredentialGateway, RetryPolicy, Verification};
