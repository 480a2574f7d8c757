//! Command-line runtime for the stencil specialization tool.
//!
//! The module owns argument parsing, the read–specialise–tidy–write
//! pipeline, and the optional JSON run report. It is designed to be
//! exercised both from the binary entrypoint and from tests where the IO
//! streams can be substituted.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use stencil_core::{Flavour, specialise_flavour};
use tracing::info;

mod errors;
mod report;
mod telemetry;
mod tidy;

pub use errors::CliError;
pub use report::RunReport;
pub use tidy::tidy;

/// Command-line arguments for the `stencil` binary.
#[derive(Debug, Parser)]
#[command(
    name = "stencil",
    about = "Specialises an ordered container's generic source into self-contained method bodies"
)]
pub struct Cli {
    /// Path to one flavour's container source.
    input: Utf8PathBuf,

    /// Container flavour of the input.
    #[arg(long, value_name = "map|set")]
    flavour: Flavour,

    /// Write the specialized source here instead of stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    /// Also print a JSON run report on stdout.
    #[arg(long)]
    report: bool,

    /// Tracing filter directive (e.g. `stencil_core=debug`).
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    log_filter: String,
}

/// Parses arguments and runs the specialization pipeline.
///
/// Returns the process exit code: success, `2` for usage errors, or a
/// generic failure for pipeline errors (reported on `stderr`).
pub fn run<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            return if err.use_stderr() {
                let _ = write!(stderr, "{err}");
                ExitCode::from(2)
            } else {
                // --help and --version render through the same path.
                let _ = write!(stdout, "{err}");
                ExitCode::SUCCESS
            };
        }
    };

    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(stderr, "stencil: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli, stdout: &mut dyn Write) -> Result<(), CliError> {
    telemetry::initialise(&cli.log_filter)?;

    let source = fs::read_to_string(cli.input.as_std_path()).map_err(|source| {
        CliError::ReadInput {
            path: cli.input.clone(),
            source,
        }
    })?;

    let result = specialise_flavour(&source, cli.flavour)?;
    let counts = result.counts();
    let output = tidy::tidy(result.output());

    match &cli.output {
        Some(path) => {
            fs::write(path.as_std_path(), &output).map_err(|source| CliError::WriteOutput {
                path: path.clone(),
                source,
            })?;
            info!(path = %path, "specialized source written");
        }
        None => stdout.write_all(output.as_bytes()).map_err(CliError::Stream)?,
    }

    if cli.report {
        let run_report = RunReport::new(cli.flavour, counts);
        let rendered = serde_json::to_string(&run_report).map_err(CliError::Report)?;
        writeln!(stdout, "{rendered}").map_err(CliError::Stream)?;
    }

    Ok(())
}
