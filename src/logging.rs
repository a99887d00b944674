//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingEnvConfig;
use crate::error::Error;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(format: Option<&str>) -> Result<Self, Error> {
        match format.unwrap_or("compact") {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!(
                "Invalid log format '{}'. Must be one of: compact, pretty, json",
                other
            ))),
        }
    }
}

/// Filter directives: `RUST_LOG` wins, otherwise the configured level for this
/// crate and `warn` for dependencies
pub fn env_filter(logging: &LoggingEnvConfig) -> EnvFilter {
    let level = logging.level.as_deref().unwrap_or("info");
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("warn,launchpad_sdk={},launchpad={}", level, level).into())
}

/// Install the global subscriber
pub fn init_logging(logging: &LoggingEnvConfig) -> Result<(), Error> {
    let format = LogFormat::parse(logging.format.as_deref())?;
    let ansi = logging.enable_colors.unwrap_or(true);
    let registry = tracing_subscriber::registry().with(env_filter(logging));

    let result = match format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_ansi(ansi))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(ansi))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| Error::Config(format!("Failed to initialise logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse(None).unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::parse(Some("json")).unwrap(), LogFormat::Json);
        assert!(LogFormat::parse(Some("xml")).is_err());
    }

    #[test]
    fn test_invalid_format_fails_before_install() {
        let logging = LoggingEnvConfig {
            format: Some("yaml".to_string()),
            ..Default::default()
        };
        assert!(matches!(init_logging(&logging), Err(Error::Config(_))));
    }
}
