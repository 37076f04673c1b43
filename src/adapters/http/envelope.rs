//! Uniform `{ok, message, payload}` response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Response body shared by every write endpoint.
///
/// Construction goes through [`success`](Self::success) and
/// [`failure`](Self::failure), so a failed envelope always carries a message
/// and never a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl ResultEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            payload: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            payload: None,
        }
    }

    /// Attaches a payload. Ignored on failed envelopes.
    pub fn with_payload(mut self, payload: Value) -> Self {
        if self.ok {
            self.payload = Some(payload);
        }
        self
    }

    /// Pairs the envelope with a status code.
    pub fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
