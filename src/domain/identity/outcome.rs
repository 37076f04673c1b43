//! Terminal states of a login attempt.

use super::IdentityRecord;

/// Result of one authentication attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// Username absent or blank, or password absent or empty. The store was not touched.
    MissingFields,
    /// The store could not be reached or failed mid-lookup.
    StoreUnavailable,
    /// No identity matches the pair.
    InvalidCredentials,
    /// Exactly one identity matched.
    Success(IdentityRecord),
}

impl AuthOutcome {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::StoreUnavailable => "store_unavailable",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Success(_) => "success",
        }
    }
}
