//! Top-level router: endpoints plus the shared middleware stack.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::map_response,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;

use super::envelope::ResultEnvelope;
use super::login::{login_routes, LoginHandlers};
use super::submission::{submission_routes, SubmissionHandlers};

/// Settings for the middleware stack.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
}

impl From<&AppConfig> for RouterConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_body_bytes: config.upload.max_body_bytes,
            request_timeout: config.server.request_timeout(),
            cors_origins: config.server.cors_origins_list(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health - Liveness probe
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the application router with all endpoints.
pub fn app_router(
    login: LoginHandlers,
    submissions: SubmissionHandlers,
    config: &RouterConfig,
) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(login_routes(login))
        .merge(submission_routes(submissions))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        // Order matters: the first layer added here runs first.
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(map_response(envelope_timeout))
                .layer(TimeoutLayer::new(config.request_timeout))
                .layer(cors_layer(&config.cors_origins))
                .into_inner(),
        )
}

/// Gives the timeout layer's bodiless 408 the usual envelope.
///
/// Handler-produced 408s already carry a JSON body and pass through.
async fn envelope_timeout(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return ResultEnvelope::failure("request timed out").respond(StatusCode::REQUEST_TIMEOUT);
    }
    response
}

/// Cross-origin access for the listed origins only. No origins, no CORS.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
