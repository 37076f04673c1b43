//! AuthenticateHandler - classifies a login attempt.

use tracing::{error, info};

use crate::domain::identity::{AuthOutcome, Credential};

use super::credential_gateway::{CredentialGateway, Verification};

/// Raw login fields as received.
#[derive(Debug, Clone, Default)]
pub struct LoginCommand {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Handler for login attempts.
pub struct AuthenticateHandler {
    gateway: CredentialGateway,
}

impl AuthenticateHandler {
    pub fn new(gateway: CredentialGateway) -> Self {
        Self { gateway }
    }

    /// Runs one attempt. Never fails: every path ends in an [`AuthOutcome`].
    pub async fn handle(&self, cmd: LoginCommand) -> AuthOutcome {
        let credential = match Credential::from_parts(cmd.username, cmd.password) {
            Ok(credential) => credential,
            Err(_) => {
                info!(outcome = AuthOutcome::MissingFields.kind(), "login attempt");
                return AuthOutcome::MissingFields;
            }
        };

        let outcome = match self.gateway.verify(&credential).await {
            Ok(Verification::Match(record)) => AuthOutcome::Success(record),
            Ok(Verification::NoMatch) => AuthOutcome::InvalidCredentials,
            Err(e) => {
                error!(username = %credential.username(), error = %e, "identity store unavailable");
                AuthOutcome::StoreUnavailable
            }
        };

        info!(
            username = %credential.username(),
            outcome = outcome.kind(),
            "login attempt"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIdentityConnector;
    use crate::domain::identity::{IdentityRecord, PasswordScheme};
    use crate::ports::StoreError;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn connector() -> InMemoryIdentityConnector {
        let record: IdentityRecord = vec![("id".to_string(), json!(7))].into_iter().collect();
        InMemoryIdentityConnector::new(PasswordScheme::Plaintext).with_account(
            "admin",
            "s3cret!",
            record,
        )
    }

    fn handler(connector: InMemoryIdentityConnector) -> AuthenticateHandler {
        AuthenticateHandler::new(CredentialGateway::new(Arc::new(connector)))
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    /// Replaces the character at `index` with a different one.
    fn mutate(value: &str, index: usize, replacement: char) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let index = index % chars.len();
        chars[index] = if chars[index] == replacement {
            if replacement == 'x' { 'y' } else { 'x' }
        } else {
            replacement
        };
        chars.into_iter().collect()
    }

    #[tokio::test]
    async fn known_good_pair_succeeds_with_record() {
        let outcome = handler(connector())
            .handle(LoginCommand::new("admin", "s3cret!"))
            .await;

        match outcome {
            AuthOutcome::Success(record) => {
                assert_eq!(record.get("id"), Some(&json!(7)));
                assert_eq!(record.get("username"), Some(&json!("admin")));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let outcome = handler(connector())
            .handle(LoginCommand::new("admin", "wrong"))
            .await;
        assert_eq!(outcome, AuthOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn unknown_user_is_invalid_credentials() {
        let outcome = handler(connector())
            .handle(LoginCommand::new("nobody", "s3cret!"))
            .await;
        assert_eq!(outcome, AuthOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn store_failure_is_store_unavailable() {
        let connector =
            connector().unavailable(StoreError::Unavailable("Access denied for user".into()));
        let outcome = handler(connector)
            .handle(LoginCommand::new("admin", "s3cret!"))
            .await;
        assert_eq!(outcome, AuthOutcome::StoreUnavailable);
    }

    #[tokio::test]
    async fn missing_fields_never_touch_the_store() {
        let connector = connector();
        let stats = connector.stats();
        let handler = handler(connector);

        for cmd in [
            LoginCommand::default(),
            LoginCommand {
                username: Some("admin".to_string()),
                password: None,
            },
            LoginCommand {
                username: None,
                password: Some("s3cret!".to_string()),
            },
            LoginCommand::new("", ""),
        ] {
            assert_eq!(handler.handle(cmd).await, AuthOutcome::MissingFields);
        }
        assert_eq!(stats.connect_calls(), 0);
    }

    #[tokio::test]
    async fn whitespace_password_is_checked_against_the_store() {
        let connector = connector();
        let stats = connector.stats();

        let outcome = handler(connector)
            .handle(LoginCommand::new("admin", "   "))
            .await;

        assert_eq!(outcome, AuthOutcome::InvalidCredentials);
        assert_eq!(stats.connect_calls(), 1);
    }

    proptest! {
        #[test]
        fn empty_field_short_circuits(value in "[a-zA-Z0-9!@#]{1,24}", blank_username in any::<bool>()) {
            let connector = connector();
            let stats = connector.stats();
            let handler = handler(connector);

            let cmd = if blank_username {
                LoginCommand::new("", value)
            } else {
                LoginCommand::new(value, "")
            };
            let outcome = runtime().block_on(handler.handle(cmd));

            prop_assert_eq!(outcome, AuthOutcome::MissingFields);
            prop_assert_eq!(stats.connect_calls(), 0);
        }

        #[test]
        fn single_character_mutation_is_rejected(
            index in 0usize..64,
            replacement in proptest::char::range('!', '~'),
            mutate_username in any::<bool>(),
        ) {
            let connector = connector();
            let stats = connector.stats();
            let handler = handler(connector);

            let cmd = if mutate_username {
                LoginCommand::new(mutate("admin", index, replacement), "s3cret!")
            } else {
                LoginCommand::new("admin", mutate("s3cret!", index, replacement))
            };
            let outcome = runtime().block_on(handler.handle(cmd));

            prop_assert_eq!(outcome, AuthOutcome::InvalidCredentials);
            prop_assert_eq!(stats.acquired(), stats.released());
        }
    }
}
