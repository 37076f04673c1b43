//! Filesystem Submission Store Adapter
//!
//! Each accepted submission becomes one directory:
//!
//! ```text
//! <root>/<category>/<submission_id>/
//!     manifest.json
//!     00-<file>
//!     01-<file>
//! ```
//!
//! Files are first written to `<root>/.staging/<submission_id>` and the
//! directory is moved into place with a single rename, so a submission is
//! visible either complete or not at all.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{SubmissionId, Timestamp};
use crate::domain::submission::{Submission, SubmissionCategory};
use crate::ports::{StorageError, StoredFile, StoredSubmission, SubmissionStore};

const STAGING_DIR: &str = ".staging";
const MANIFEST_FILE: &str = "manifest.json";

/// File-based storage for submissions
#[derive(Debug, Clone)]
pub struct LocalSubmissionStore {
    root: PathBuf,
}

/// Metadata written beside the stored files.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    #[serde(flatten)]
    stored: &'a StoredSubmission,
    title: &'a str,
    body: &'a str,
}

impl LocalSubmissionStore {
    /// Create a store rooted at `root`
    ///
    /// # Example
    /// ```ignore
    /// let store = LocalSubmissionStore::new("./data/uploads");
    /// ```
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Final directory of a stored submission
    pub fn submission_dir(&self, category: SubmissionCategory, id: SubmissionId) -> PathBuf {
        self.root.join(category.as_str()).join(id.to_string())
    }

    fn staging_dir(&self, id: SubmissionId) -> PathBuf {
        self.root.join(STAGING_DIR).join(id.to_string())
    }

    async fn write_staged(
        &self,
        staging: &Path,
        submission: &Submission,
        stored: &StoredSubmission,
    ) -> Result<(), StorageError> {
        fs::create_dir_all(staging).await?;

        for (attachment, file) in submission.attachments().into_iter().zip(&stored.files) {
            fs::write(staging.join(&file.stored_name), attachment.content()).await?;
        }

        let manifest = Manifest {
            stored,
            title: submission.title(),
            body: submission.body(),
        };
        let json = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| StorageError::io(format!("manifest serialization failed: {}", e)))?;
        fs::write(staging.join(MANIFEST_FILE), json).await?;

        Ok(())
    }

    async fn publish(&self, staging: &Path, target: &Path) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(staging, target).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for LocalSubmissionStore {
    async fn persist(&self, submission: &Submission) -> Result<StoredSubmission, StorageError> {
        let stored = StoredSubmission {
            id: SubmissionId::new(),
            category: submission.category(),
            received_at: Timestamp::now(),
            files: submission
                .attachments()
                .into_iter()
                .enumerate()
                .map(|(index, attachment)| StoredFile::from_attachment(index, attachment))
                .collect(),
        };

        let staging = self.staging_dir(stored.id);
        let target = self.submission_dir(stored.category, stored.id);

        let result = match self.write_staged(&staging, submission, &stored).await {
            Ok(()) => self.publish(&staging, &target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_dir_all(&staging).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %staging.display(),
                        error = %cleanup,
                        "failed to remove staging directory"
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(path = %target.display(), "submission written");
        Ok(stored)
    }
}
