//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps)
//! - `identity` - Credentials, password schemes and login outcomes
//! - `submission` - Content categories, field schemas and validators

pub mod foundation;
pub mod identity;
pub mod submission;
