use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    Filter { directive: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directive, .. } => {
                write!(f, "log filter directive '{directive}' does not parse")
            }
            TelemetryError::Init(err) => write!(f, "subscriber install failed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

/// Parse the level/filter string configured through `APP_LOG_LEVEL`.
fn configured_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::Filter {
        directive: directive.to_string(),
        source,
    })
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when it is set; otherwise the configured
/// level applies to every target. Output is single-line and plain, for log
/// collectors rather than terminals.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => configured_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Init)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_level_and_directive_strings_parse() {
        assert!(configured_filter("info").is_ok());
        assert!(configured_filter("subsidiematch=debug,warn").is_ok());
    }

    #[test]
    fn malformed_directive_is_reported_with_its_text() {
        let err = configured_filter("no=such=level").expect_err("directive is malformed");
        assert!(err.to_string().contains("no=such=level"));
    }
}
