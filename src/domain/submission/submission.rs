//! Category-polymorphic submission assembled from decoded fields.

use super::schema::names;
use super::{Attachment, ContentError, DecodedFields, SubmissionCategory};

/// A client submission in one of three categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Materials {
        title: String,
        description: String,
        files: Vec<Attachment>,
    },
    Pdf {
        title: String,
        description: String,
        file: Attachment,
    },
    Announcement {
        title: String,
        text: String,
        image: Option<Attachment>,
    },
}

impl Submission {
    /// Assembles the category's variant from fields decoded against its schema.
    ///
    /// # Errors
    ///
    /// `ContentError::MissingAttachment` if a PDF submission carries no file.
    pub fn from_fields(
        category: SubmissionCategory,
        mut fields: DecodedFields,
    ) -> Result<Self, ContentError> {
        let submission = match category {
            SubmissionCategory::Materials => Self::Materials {
                title: fields.take_text(names::MATERIALS_TITLE),
                description: fields.take_text(names::MATERIALS_DESCRIPTION),
                files: fields.take_files(names::MATERIALS_FILES),
            },
            SubmissionCategory::Pdf => Self::Pdf {
                title: fields.take_text(names::PDF_TITLE),
                description: fields.take_text(names::PDF_DESCRIPTION),
                file: fields
                    .take_file(names::PDF_FILE)
                    .ok_or(ContentError::MissingAttachment("PDF file"))?,
            },
            SubmissionCategory::Announcement => Self::Announcement {
                title: fields.take_text(names::ANNOUNCEMENT_TITLE),
                text: fields.take_text(names::ANNOUNCEMENT_TEXT),
                image: fields.take_file(names::ANNOUNCEMENT_IMAGE),
            },
        };
        Ok(submission)
    }

    pub fn category(&self) -> SubmissionCategory {
        match self {
            Self::Materials { .. } => SubmissionCategory::Materials,
            Self::Pdf { .. } => SubmissionCategory::Pdf,
            Self::Announcement { .. } => SubmissionCategory::Announcement,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Materials { title, .. }
            | Self::Pdf { title, .. }
            | Self::Announcement { title, .. } => title,
        }
    }

    /// Description for materials and PDFs, body text for announcements.
    pub fn body(&self) -> &str {
        match self {
            Self::Materials { description, .. } | Self::Pdf { description, .. } => description,
            Self::Announcement { text, .. } => text,
        }
    }

    /// Every attached file, in submission order.
    pub fn attachments(&self) -> Vec<&Attachment> {
        match self {
            Self::Materials { files, .. } => files.iter().collect(),
            Self::Pdf { file, .. } => vec![file],
            Self::Announcement { image, .. } => image.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> Attachment {
        Attachment::new("report.pdf", "application/pdf", b"%PDF-1.7".to_vec())
    }

    #[test]
    fn materials_from_fields() {
        let mut fields = DecodedFields::new();
        fields.insert_text("titulo", "Aula 1".to_string());
        fields.push_file("files", pdf());
        fields.push_file("files", Attachment::new("slide.png", "image/png", vec![1]));

        let submission = Submission::from_fields(SubmissionCategory::Materials, fields).unwrap();
        assert_eq!(submission.category(), SubmissionCategory::Materials);
        assert_eq!(submission.title(), "Aula 1");
        assert_eq!(submission.body(), "");
        assert_eq!(submission.attachments().len(), 2);
    }

    #[test]
    fn pdf_from_fields_requires_file() {
        let mut fields = DecodedFields::new();
        fields.insert_text("title", "Report".to_string());

        let err = Submission::from_fields(SubmissionCategory::Pdf, fields).unwrap_err();
        assert_eq!(err, ContentError::MissingAttachment("PDF file"));
        assert!(err.to_string().contains("PDF"));
    }

    #[test]
    fn pdf_from_fields_takes_file() {
        let mut fields = DecodedFields::new();
        fields.insert_text("description", "Quarterly".to_string());
        fields.push_file("file", pdf());

        let submission = Submission::from_fields(SubmissionCategory::Pdf, fields).unwrap();
        match &submission {
            Submission::Pdf { description, file, .. } => {
                assert_eq!(description, "Quarterly");
                assert_eq!(file.filename(), "report.pdf");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn announcement_without_image() {
        let mut fields = DecodedFields::new();
        fields.insert_text("titulo", "Feriado".to_string());
        fields.insert_text("texto", "Sem expediente".to_string());

        let submission =
            Submission::from_fields(SubmissionCategory::Announcement, fields).unwrap();
        assert_eq!(submission.body(), "Sem expediente");
        assert!(submission.attachments().is_empty());
    }
}
