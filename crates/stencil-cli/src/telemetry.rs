//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

use crate::errors::CliError;

/// Installs the global tracing subscriber with the given filter.
///
/// Repeated initialisation (tests invoking the runtime in-process) is not
/// an error; the first subscriber wins.
pub(crate) fn initialise(filter: &str) -> Result<(), CliError> {
    let env_filter =
        EnvFilter::try_new(filter).map_err(|err| CliError::Telemetry(err.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    Ok(())
}
