//! Submission application handlers.

mod submit;

pub use submit::{SubmitError, SubmitHandler};
