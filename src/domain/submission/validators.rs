//! Per-category content rules.
//!
//! Pure functions over already-decoded values; no I/O.

use thiserror::Error;

use super::{Attachment, Submission};

const PDF_MIME: &str = "application/pdf";
const IMAGE_MIME_PREFIX: &str = "image/";

/// Client-correctable content problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("select at least one file to upload")]
    EmptyAttachmentSet,

    #[error("{0} is required")]
    MissingAttachment(&'static str),

    #[error("{0} must not be blank")]
    MissingRequiredText(&'static str),

    #[error("{expected} expected, got '{found}'")]
    UnsupportedMediaType {
        expected: &'static str,
        found: String,
    },
}

/// Materials need at least one file; any MIME type is accepted.
pub fn validate_materials(files: &[Attachment]) -> Result<(), ContentError> {
    if files.is_empty() {
        return Err(ContentError::EmptyAttachmentSet);
    }
    Ok(())
}

/// The file must be declared exactly as `application/pdf`.
pub fn validate_pdf(file: &Attachment) -> Result<(), ContentError> {
    if file.mime_essence() != PDF_MIME {
        return Err(ContentError::UnsupportedMediaType {
            expected: "a PDF file (application/pdf)",
            found: file.mime_type().to_string(),
        });
    }
    Ok(())
}

/// Title and text must be non-blank; an image, if present, must be `image/*`.
pub fn validate_announcement(
    title: &str,
    text: &str,
    image: Option<&Attachment>,
) -> Result<(), ContentError> {
    if title.trim().is_empty() {
        return Err(ContentError::MissingRequiredText("title"));
    }
    if text.trim().is_empty() {
        return Err(ContentError::MissingRequiredText("text"));
    }
    if let Some(image) = image {
        if !image.mime_essence().starts_with(IMAGE_MIME_PREFIX) {
            return Err(ContentError::UnsupportedMediaType {
                expected: "an image (image/*)",
                found: image.mime_type().to_string(),
            });
        }
    }
    Ok(())
}

/// Dispatches to the category's validator.
pub fn validate(submission: &Submission) -> Result<(), ContentError> {
    match submission {
        Submission::Materials { files, .. } => validate_materials(files),
        Submission::Pdf { file, .. } => validate_pdf(file),
        Submission::Announcement { title, text, image } => {
            validate_announcement(title, text, image.as_ref())
        }
    }
}
