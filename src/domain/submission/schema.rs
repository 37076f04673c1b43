//! Declarative multipart field schemas, one per submission category.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::Attachment;

/// Category of a client submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionCategory {
    Materials,
    Pdf,
    Announcement,
}

impl SubmissionCategory {
    pub const ALL: [SubmissionCategory; 3] = [Self::Materials, Self::Pdf, Self::Announcement];

    /// Field table for this category.
    pub fn schema(self) -> &'static SubmissionSchema {
        match self {
            Self::Materials => &MATERIALS_SCHEMA,
            Self::Pdf => &PDF_SCHEMA,
            Self::Announcement => &ANNOUNCEMENT_SCHEMA,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Materials => "materials",
            Self::Pdf => "pdf",
            Self::Announcement => "announcement",
        }
    }
}

impl fmt::Display for SubmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a named multipart field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text value.
    Text,
    /// Zero or more files, order preserved.
    Files,
    /// At most one file.
    SingleFile,
}

/// One entry of a category schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Multipart part name.
    pub name: &'static str,
    /// Human-readable name used in error messages.
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: false,
        }
    }

    const fn files(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Files,
            required: false,
        }
    }

    const fn single_file(name: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::SingleFile,
            required,
        }
    }
}

/// Field name → kind table consumed by the multipart parser.
#[derive(Debug)]
pub struct SubmissionSchema {
    category: SubmissionCategory,
    fields: &'static [FieldSpec],
}

impl SubmissionSchema {
    pub fn category(&self) -> SubmissionCategory {
        self.category
    }

    /// Looks up a field by its multipart name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|spec| spec.required)
    }
}

pub(crate) mod names {
    pub const MATERIALS_TITLE: &str = "titulo";
    pub const MATERIALS_DESCRIPTION: &str = "descricao";
    pub const MATERIALS_FILES: &str = "files";

    pub const PDF_TITLE: &str = "title";
    pub const PDF_DESCRIPTION: &str = "description";
    pub const PDF_FILE: &str = "file";

    pub const ANNOUNCEMENT_TITLE: &str = "titulo";
    pub const ANNOUNCEMENT_TEXT: &str = "texto";
    pub const ANNOUNCEMENT_IMAGE: &str = "imagem";
}

static MATERIALS_SCHEMA: SubmissionSchema = SubmissionSchema {
    category: SubmissionCategory::Materials,
    fields: &[
        FieldSpec::text(names::MATERIALS_TITLE, "title"),
        FieldSpec::text(names::MATERIALS_DESCRIPTION, "description"),
        FieldSpec::files(names::MATERIALS_FILES, "files"),
    ],
};

static PDF_SCHEMA: SubmissionSchema = SubmissionSchema {
    category: SubmissionCategory::Pdf,
    fields: &[
        FieldSpec::text(names::PDF_TITLE, "title"),
        FieldSpec::text(names::PDF_DESCRIPTION, "description"),
        FieldSpec::single_file(names::PDF_FILE, "PDF file", true),
    ],
};

static ANNOUNCEMENT_SCHEMA: SubmissionSchema = SubmissionSchema {
    category: SubmissionCategory::Announcement,
    fields: &[
        FieldSpec::text(names::ANNOUNCEMENT_TITLE, "title"),
        FieldSpec::text(names::ANNOUNCEMENT_TEXT, "text"),
        FieldSpec::single_file(names::ANNOUNCEMENT_IMAGE, "image", false),
    ],
};

/// Values decoded from a multipart body, keyed by schema field name.
#[derive(Debug, Default)]
pub struct DecodedFields {
    texts: HashMap<&'static str, String>,
    files: HashMap<&'static str, Vec<Attachment>>,
}

impl DecodedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a text value. Returns `false` if the field already had one.
    pub fn insert_text(&mut self, name: &'static str, value: String) -> bool {
        if self.texts.contains_key(name) {
            return false;
        }
        self.texts.insert(name, value);
        true
    }

    /// Appends a file, keeping arrival order.
    pub fn push_file(&mut self, name: &'static str, attachment: Attachment) {
        self.files.entry(name).or_default().push(attachment);
    }

    /// True if the field received a value.
    pub fn contains(&self, name: &str) -> bool {
        self.texts.contains_key(name) || self.files.get(name).is_some_and(|f| !f.is_empty())
    }

    pub fn file_count(&self, name: &str) -> usize {
        self.files.get(name).map_or(0, Vec::len)
    }

    pub fn text(&self, name: &str) -> &str {
        self.texts.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Removes a text value; absent fields yield an empty string.
    pub fn take_text(&mut self, name: &str) -> String {
        self.texts.remove(name).unwrap_or_default()
    }

    pub fn take_files(&mut self, name: &str) -> Vec<Attachment> {
        self.files.remove(name).unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<Attachment> {
        self.take_files(name).into_iter().next()
    }
}
