//! Error types for the CLI runtime.

use std::io;

use camino::Utf8PathBuf;
use stencil_core::EngineError;
use thiserror::Error;

/// Failures surfaced by the `stencil` binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// The input source file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadInput {
        /// Path that failed to read.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    WriteOutput {
        /// Path that failed to write.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// Writing to the output stream failed.
    #[error("failed to write to the output stream: {0}")]
    Stream(#[source] io::Error),

    /// Rendering the JSON run report failed.
    #[error("failed to render the run report: {0}")]
    Report(#[source] serde_json::Error),

    /// The specialization engine rejected the source.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The tracing subscriber could not be configured.
    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
}
