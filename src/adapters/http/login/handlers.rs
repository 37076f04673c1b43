//! HTTP handlers for the login endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::adapters::http::ResultEnvelope;
use crate::application::{AuthenticateHandler, LoginCommand};
use crate::domain::identity::AuthOutcome;

use super::dto::LoginRequest;

#[derive(Clone)]
pub struct LoginHandlers {
    authenticate: Arc<AuthenticateHandler>,
}

impl LoginHandlers {
    pub fn new(authenticate: Arc<AuthenticateHandler>) -> Self {
        Self { authenticate }
    }
}

/// POST /login - Verify a username/password pair
///
/// A body that is not a JSON object is handled like one with both fields
/// missing.
pub async fn login(
    State(handlers): State<LoginHandlers>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let cmd = match payload {
        Ok(Json(req)) => LoginCommand::from(req),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "login body rejected");
            LoginCommand::default()
        }
    };

    outcome_response(handlers.authenticate.handle(cmd).await)
}

fn outcome_response(outcome: AuthOutcome) -> Response {
    match outcome {
        AuthOutcome::Success(record) => ResultEnvelope::success("login successful")
            .with_payload(record.into_value())
            .respond(StatusCode::OK),
        AuthOutcome::MissingFields => ResultEnvelope::failure("username and password are required")
            .respond(StatusCode::BAD_REQUEST),
        AuthOutcome::InvalidCredentials => {
            ResultEnvelope::failure("invalid username or password")
                .respond(StatusCode::UNAUTHORIZED)
        }
        AuthOutcome::StoreUnavailable => {
            ResultEnvelope::failure("connection error").respond(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
