use tracing_subscriber::EnvFilter;

use crate::error::CliError;

const DEFAULT_FILTER: &str = "warn";

/// Installs the stderr log subscriber.
///
/// `directive` wins over `RUST_LOG`; without either only warnings are shown.
pub fn init(directive: Option<&str>) -> Result<(), CliError> {
    let filter = match directive {
        Some(directive) => {
            EnvFilter::try_new(directive).map_err(|error| CliError::Logging(error.to_string()))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| CliError::Logging(error.to_string()))
}
