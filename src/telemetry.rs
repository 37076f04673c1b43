//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured filter. Development gets
//! compact human-readable lines, production gets one JSON object per event.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: &ServerConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(&config.log_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let result = if config.is_production() {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.compact().try_init()
    };

    result.map_err(TelemetryError::Subscriber)
}

fn build_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|source| TelemetryError::EnvFilter {
            value: fallback.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_level_parses() {
        let config = ServerConfig::default();
        assert!(EnvFilter::try_new(&config.log_level).is_ok());
    }

    #[test]
    fn invalid_filter_is_reported_with_value() {
        let err = EnvFilter::try_new("info,web=verbose")
            .map_err(|source| TelemetryError::EnvFilter {
                value: "info,web=verbose".to_string(),
                source,
            })
            .unwrap_err();
        assert!(err.to_string().contains("info,web=verbose"));
    }
}
