//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured `log.level`. With
//! `log.json = true` events are written as JSON lines.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Telemetry-specific error type
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{0}': {1}")]
    InvalidFilter(String, String),
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

/// Build the filter used by [`init_tracing`]
pub fn env_filter(config: &LogConfig) -> TelemetryResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| TelemetryError::InvalidFilter(config.level.clone(), e.to_string())),
    }
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LogConfig) -> TelemetryResult<()> {
    let filter = env_filter(config)?;

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    result.map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;

    tracing::info!(level = %config.level, json = config.json, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LogConfig {
            level: "ara_email_preview=notalevel".to_string(),
            json: false,
        };
        assert!(matches!(
            env_filter(&config),
            Err(TelemetryError::InvalidFilter(_, _))
        ));
    }

    #[test]
    fn test_default_level_accepted() {
        assert!(env_filter(&LogConfig::default()).is_ok());
    }
}
