//! HTTP routes for the login endpoint.

use axum::{routing::post, Router};

use super::handlers::{login, LoginHandlers};

/// Creates the login router.
pub fn login_routes(handlers: LoginHandlers) -> Router {
    Router::new()
        .route("/login", post(login))
        .with_state(handlers)
}
