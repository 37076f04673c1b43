//! In-memory submission store.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{SubmissionId, Timestamp};
use crate::domain::submission::Submission;
use crate::ports::{StorageError, StoredFile, StoredSubmission, SubmissionStore};

/// Keeps persisted submissions in a vector.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    stored: Mutex<Vec<(StoredSubmission, Submission)>>,
    fail_with: Option<StorageError>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every `persist` fails with `error`.
    pub fn failing(error: StorageError) -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    /// Identifiers of everything persisted so far.
    pub fn stored(&self) -> Vec<StoredSubmission> {
        self.lock().iter().map(|(stored, _)| stored.clone()).collect()
    }

    /// Full submissions persisted so far.
    pub fn submissions(&self) -> Vec<Submission> {
        self.lock()
            .iter()
            .map(|(_, submission)| submission.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(StoredSubmission, Submission)>> {
        self.stored.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn persist(&self, submission: &Submission) -> Result<StoredSubmission, StorageError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

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

        self.lock().push((stored.clone(), submission.clone()));
        Ok(stored)
    }
}
