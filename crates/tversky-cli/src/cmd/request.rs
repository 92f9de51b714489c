//! `tversky request`: answer one JSON calculation request.
//!
//! The response is always JSON, whatever the output mode, since it is the
//! wire payload itself. A failure payload is still printed to stdout; the
//! command then exits non-zero.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tversky_core::api::{CalculateResponse, Service};
use tversky_core::config::TverskyConfig;

use crate::output::{CliError, OutputMode, render_error, render_json};

#[derive(Args, Debug, Default)]
#[command(
    about = "Answer a JSON calculation request",
    long_about = "Read a calculation request and print the response payload.\n\n\
                  The request is a JSON object with setA and setB (comma-separated\n\
                  element lists) and optional alpha and beta weights, given as numbers\n\
                  or numeric strings. Missing weights default to 1.",
    after_help = "EXAMPLES:\n    echo '{\"setA\": \"x, y, z\", \"setB\": \"y, z, w\"}' | tversky request\n\n\
                  tversky request --file request.json"
)]
pub struct RequestArgs {
    /// Read the request from this file instead of stdin.
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,
}

fn read_body(args: &RequestArgs) -> anyhow::Result<String> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request from {}", path.display()));
    }
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("Failed to read request from stdin")?;
    Ok(body)
}

/// Execute `tversky request`.
///
/// # Errors
///
/// Returns an error if the request cannot be read, or if the response is a
/// failure payload.
pub fn run_request(
    args: &RequestArgs,
    config: &TverskyConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let body = match read_body(args) {
        Ok(body) => body,
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    "pass --file with a readable path or pipe the request on stdin",
                    "request_unreadable",
                ),
            )?;
            return Err(err);
        }
    };

    let response = Service::from_config(config).handle_json(&body);
    render_json(&response)?;

    match response {
        CalculateResponse::Success(_) => Ok(()),
        CalculateResponse::Failure(failure) => {
            anyhow::bail!("request failed with {}", failure.error_code)
        }
    }
}
