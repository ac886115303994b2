//! Tracing setup shared by the service binary and the CLI paths.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install tracing subscriber")]
    Init(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Default filter when `RUST_LOG` is unset: the configured level for this
/// workspace's crates, with the HTTP stack held at `warn` so request noise
/// does not drown out assessment and auth events.
fn default_directives(level: &str) -> String {
    format!("{level},hyper=warn,tower=warn,reqwest=warn")
}

fn fallback_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(default_directives(level)).map_err(|source| TelemetryError::Filter {
        value: level.to_string(),
        source,
    })
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => fallback_filter(&config.log_level)?,
    };
    let rendered = env_filter.to_string();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Init)?;

    tracing::debug!(filter = %rendered, "telemetry initialized");
    Ok(())
}
