//! Submission module - content categories accepted by the ingestion pipeline.
//!
//! A submission arrives as multipart form data, is decoded against the
//! category's [`SubmissionSchema`], assembled into a [`Submission`] and
//! checked by the category validator before anything is persisted.
//!
//! | Category | Fields | Rule |
//! |----------|--------|------|
//! | Materials | `titulo`, `descricao`, `files[]` | at least one file |
//! | Pdf | `title`, `description`, `file` | file must be `application/pdf` |
//! | Announcement | `titulo`, `texto`, `imagem?` | non-blank text, image must be `image/*` |

mod attachment;
mod schema;
mod submission;
mod validators;

pub use attachment::Attachment;
pub use schema::{DecodedFields, FieldKind, FieldSpec, SubmissionCategory, SubmissionSchema};
pub use submission::Submission;
pub use validators::{
    validate, validate_announcement, validate_materials, validate_pdf, ContentError,
};
