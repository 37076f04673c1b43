//! SubmitHandler - validates and persists a decoded submission.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::domain::submission::{validate, ContentError, Submission};
use crate::ports::{StorageError, StoredSubmission, SubmissionStore};

/// Why a submission was not accepted.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("submission could not be stored: {0}")]
    Storage(#[from] StorageError),
}

/// Handler shared by the three submission endpoints.
pub struct SubmitHandler {
    store: Arc<dyn SubmissionStore>,
}

impl SubmitHandler {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Validates `submission` and hands it to the store.
    ///
    /// Nothing reaches the store unless validation passes.
    pub async fn handle(&self, submission: &Submission) -> Result<StoredSubmission, SubmitError> {
        let category = submission.category();
        validate(submission)?;

        let stored = self.store.persist(submission).await.map_err(|e| {
            error!(%category, error = %e, "failed to persist submission");
            e
        })?;

        info!(
            %category,
            submission_id = %stored.id,
            files = stored.files.len(),
            "submission stored"
        );
        Ok(stored)
    }
}
