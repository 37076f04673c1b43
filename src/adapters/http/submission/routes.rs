//! HTTP routes for the submission endpoints.

use axum::{routing::post, Router};

use super::handlers::{publish_announcement, upload_materials, upload_pdf, SubmissionHandlers};

/// Creates the submission router.
pub fn submission_routes(handlers: SubmissionHandlers) -> Router {
    Router::new()
        .route("/upload", post(upload_materials))
        .route("/pdf", post(upload_pdf))
        .route("/avisos", post(publish_announcement))
        .with_state(handlers)
}
