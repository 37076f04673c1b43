//! Foundation module - Shared domain primitives.

mod ids;
mod timestamp;

pub use ids::SubmissionId;
pub use timestamp::Timestamp;
