//! HTTP adapter for the submission endpoints.

mod handlers;
mod routes;

pub use handlers::{publish_announcement, upload_materials, upload_pdf, SubmissionHandlers};
pub use routes::submission_routes;
