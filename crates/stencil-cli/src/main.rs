//! CLI entrypoint for the stencil specialization tool.
//!
//! The binary delegates to [`stencil_cli::run`], which parses arguments,
//! drives the specialization pipeline, and writes the rewritten source to
//! the requested destination.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    stencil_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
