use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "ADMISSIONS_LOG_LEVEL '{value}' is not a valid log filter")
            }
            TelemetryError::Subscriber(err) => write!(f, "unable to install subscriber: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Which setting produced the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterSource {
    RustLog,
    Configured,
}

/// Installs the global fmt subscriber on stderr, keeping stdout for command
/// output. A usable `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, source) = resolve_filter(rust_log.as_deref(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)?;

    tracing::debug!(source = ?source, "log filter installed");
    Ok(())
}

fn resolve_filter(
    rust_log: Option<&str>,
    configured: &str,
) -> Result<(EnvFilter, FilterSource), TelemetryError> {
    // A blank or unparsable RUST_LOG falls through to the configured level.
    if let Some(directives) = rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return Ok((filter, FilterSource::RustLog));
        }
    }

    let filter = EnvFilter::try_new(configured).map_err(|source| TelemetryError::EnvFilter {
        value: configured.to_string(),
        source,
    })?;
    Ok((filter, FilterSource::Configured))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_of(rust_log: Option<&str>, configured: &str) -> FilterSource {
        resolve_filter(rust_log, configured)
            .map(|(_, source)| source)
            .expect("filter resolves")
    }

    #[test]
    fn rust_log_wins_when_usable() {
        assert_eq!(source_of(Some("admissions=debug"), "info"), FilterSource::RustLog);
        assert_eq!(source_of(None, "info"), FilterSource::Configured);
        assert_eq!(source_of(Some("   "), "warn"), FilterSource::Configured);
        assert_eq!(source_of(Some("admissions=loud"), "warn"), FilterSource::Configured);
    }

    #[test]
    fn rejects_malformed_configured_level() {
        let error = resolve_filter(None, "admissions=loud").expect_err("filter should not parse");
        assert!(matches!(error, TelemetryError::EnvFilter { ref value, .. } if value == "admissions=loud"));
        assert_eq!(
            error.to_string(),
            "ADMISSIONS_LOG_LEVEL 'admissions=loud' is not a valid log filter"
        );
    }
}
