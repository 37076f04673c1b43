//! Submission store port - persistence for accepted submissions.
//!
//! # Contract
//!
//! `persist` is all-or-nothing: either every attachment of the submission
//! and its metadata are stored, or nothing is left behind and an error is
//! returned.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{SubmissionId, Timestamp};
use crate::domain::submission::{Attachment, Submission, SubmissionCategory};

/// Persists validated submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn persist(&self, submission: &Submission) -> Result<StoredSubmission, StorageError>;
}

/// Identifiers of a persisted submission, returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: SubmissionId,
    pub category: SubmissionCategory,
    pub received_at: Timestamp,
    pub files: Vec<StoredFile>,
}

/// One persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Name under which the file was stored.
    pub stored_name: String,
    /// Name the client supplied.
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    /// Hex-encoded SHA-256 of the content.
    pub checksum: String,
}

impl StoredFile {
    /// Describes the `index`-th attachment of a submission.
    ///
    /// The stored name is the sanitised client name prefixed with the index,
    /// so duplicates stay distinct and no path component survives.
    pub fn from_attachment(index: usize, attachment: &Attachment) -> Self {
        Self {
            stored_name: format!("{:02}-{}", index, sanitize_file_name(attachment.filename())),
            original_name: attachment.filename().to_string(),
            mime_type: attachment.mime_type().to_string(),
            size: attachment.size(),
            checksum: attachment.checksum(),
        }
    }
}

const MAX_STEM_LEN: usize = 100;
const MAX_EXTENSION_LEN: usize = 16;

/// Keeps `[A-Za-z0-9._-]` of the final path component, replacing the rest.
///
/// Long names are cut to [`MAX_STEM_LEN`] characters before the extension.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        return "file".to_string();
    }

    // Only ASCII survives the filter above, so byte offsets are char offsets.
    let (stem, extension) = match cleaned.rfind('.') {
        Some(dot) if dot > 0 && cleaned.len() - dot <= MAX_EXTENSION_LEN + 1 => {
            cleaned.split_at(dot)
        }
        _ => (cleaned, ""),
    };
    let stem = &stem[..stem.len().min(MAX_STEM_LEN)];
    format!("{stem}{extension}")
}

/// Errors that can occur while persisting a submission.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// IO error during file operation.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Permission denied on the storage location.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },
}

impl StorageError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a permission denied error.
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => StorageError::permission_denied(err.to_string()),
            _ => StorageError::io(err.to_string()),
        }
    }
}
