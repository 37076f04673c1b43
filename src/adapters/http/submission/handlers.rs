//! HTTP handlers for the submission endpoints.
//!
//! All three endpoints run the same pipeline: decode the body against the
//! category schema, assemble the submission, validate, persist.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::Response,
};

use crate::adapters::http::multipart::{self, ParseError, UploadLimits};
use crate::adapters::http::ResultEnvelope;
use crate::application::{SubmitError, SubmitHandler};
use crate::domain::submission::{ContentError, Submission, SubmissionCategory};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SubmissionHandlers {
    submit: Arc<SubmitHandler>,
    limits: UploadLimits,
}

impl SubmissionHandlers {
    pub fn new(submit: Arc<SubmitHandler>, limits: UploadLimits) -> Self {
        Self { submit, limits }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /upload - Upload course materials
pub async fn upload_materials(
    State(handlers): State<SubmissionHandlers>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    ingest(&handlers, SubmissionCategory::Materials, multipart).await
}

/// POST /pdf - Upload a PDF document
pub async fn upload_pdf(
    State(handlers): State<SubmissionHandlers>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    ingest(&handlers, SubmissionCategory::Pdf, multipart).await
}

/// POST /avisos - Publish an announcement
pub async fn publish_announcement(
    State(handlers): State<SubmissionHandlers>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    ingest(&handlers, SubmissionCategory::Announcement, multipart).await
}

async fn ingest(
    handlers: &SubmissionHandlers,
    category: SubmissionCategory,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(%category, error = %rejection, "multipart body rejected");
            return parse_error_response(category, ParseError::NotMultipart);
        }
    };

    let fields = match multipart::parse(multipart, category.schema(), &handlers.limits).await {
        Ok(fields) => fields,
        Err(e) => return parse_error_response(category, e),
    };

    let submission = match Submission::from_fields(category, fields) {
        Ok(submission) => submission,
        Err(e) => return content_error_response(category, e),
    };

    match handlers.submit.handle(&submission).await {
        Ok(stored) => match serde_json::to_value(&stored) {
            Ok(payload) => ResultEnvelope::success(confirmation(category))
                .with_payload(payload)
                .respond(StatusCode::OK),
            Err(e) => {
                tracing::error!(%category, error = %e, "failed to render stored submission");
                connection_error()
            }
        },
        Err(SubmitError::Content(e)) => content_error_response(category, e),
        // Detail already logged by the handler.
        Err(SubmitError::Storage(_)) => connection_error(),
    }
}

fn confirmation(category: SubmissionCategory) -> &'static str {
    match category {
        SubmissionCategory::Materials => "materials uploaded successfully",
        SubmissionCategory::Pdf => "PDF uploaded successfully",
        SubmissionCategory::Announcement => "announcement published successfully",
    }
}

fn parse_error_response(category: SubmissionCategory, err: ParseError) -> Response {
    tracing::info!(%category, error = %err, "submission rejected");
    ResultEnvelope::failure(err.to_string()).respond(err.status())
}

fn content_error_response(category: SubmissionCategory, err: ContentError) -> Response {
    tracing::info!(%category, error = %err, "submission rejected");
    let status = match err {
        ContentError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    ResultEnvelope::failure(err.to_string()).respond(status)
}

fn connection_error() -> Response {
    ResultEnvelope::failure("connection error").respond(StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_errors_are_415() {
        let response = content_error_response(
            SubmissionCategory::Pdf,
            ContentError::UnsupportedMediaType {
                expected: "a PDF file (application/pdf)",
                found: "image/png".to_string(),
            },
        );
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn other_content_errors_are_400() {
        let response =
            content_error_response(SubmissionCategory::Materials, ContentError::EmptyAttachmentSet);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn confirmations_differ_per_category() {
        assert_ne!(
            confirmation(SubmissionCategory::Pdf),
            confirmation(SubmissionCategory::Announcement)
        );
    }
}
