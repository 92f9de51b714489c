#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tversky_core::config::{self, TverskyConfig};
use tversky_core::error::ErrorCode;

#[derive(Parser, Debug)]
#[command(
    name = "tversky",
    author,
    version,
    about = "tversky: explainable Tversky set similarity",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment and config.
    fn output_mode(&self, config_format: Option<&str>) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, config_format)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Similarity",
        about = "Compute the Tversky index of two sets",
        long_about = "Compute the Tversky index of two comma-separated sets and explain every step."
    )]
    Compute(cmd::compute::ComputeArgs),

    #[command(
        next_help_heading = "Similarity",
        about = "Answer a JSON calculation request",
        long_about = "Read a JSON calculation request from a file or stdin and print the JSON response."
    )]
    Request(cmd::request::RequestArgs),

    #[command(
        next_help_heading = "Utilities",
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for tversky."
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose || env::var("DEBUG").is_ok() {
        "tversky_core=debug,tversky_cli=debug,info"
    } else {
        "tversky_core=info,tversky_cli=info,warn"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("TVERSKY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let format = env::var("TVERSKY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output; logs go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Load the effective config and resolve the output mode against it.
fn load_effective_config(cli: &Cli) -> anyhow::Result<(TverskyConfig, OutputMode)> {
    let project_root = env::current_dir()?;
    match config::load_config(&project_root) {
        Ok(config) => {
            debug!(?config, "effective config");
            let output = cli.output_mode(config.display.format.as_deref());
            Ok((config, output))
        }
        Err(err) => {
            output::render_error(
                cli.output_mode(None),
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            Err(err)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
        Commands::Compute(ref args) => {
            let (config, output) = load_effective_config(&cli)?;
            cmd::compute::run_compute(args, &config, output)
        }
        Commands::Request(ref args) => {
            let (config, output) = load_effective_config(&cli)?;
            cmd::request::run_request(args, &config, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["tversky", "--json", "compute", "-a", "x", "-b", "y"]);
        assert!(cli.json);
        assert!(cli.output_mode(None).is_json());
    }

    #[test]
    fn format_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["tversky", "request", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(Some("json")), OutputMode::Text);
    }

    #[test]
    fn compute_accepts_negative_weights() {
        let cli = Cli::parse_from([
            "tversky", "compute", "--set-a", "x,y", "--set-b", "y", "--alpha", "-0.5",
        ]);
        let Commands::Compute(args) = cli.command else {
            panic!("expected compute");
        };
        assert_eq!(args.alpha, Some(-0.5));
        assert_eq!(args.beta, None);
    }

    #[test]
    fn compute_parses_locale() {
        let cli = Cli::parse_from(["tversky", "compute", "-a", "x", "-b", "y", "--locale", "fa"]);
        let Commands::Compute(args) = cli.command else {
            panic!("expected compute");
        };
        assert_eq!(args.locale, Some(tversky_core::Locale::Fa));
    }

    #[test]
    fn compute_rejects_unknown_locale() {
        let result =
            Cli::try_parse_from(["tversky", "compute", "-a", "x", "-b", "y", "--locale", "de"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_wins_over_verbose_filter() {
        assert_eq!(default_filter(true, true), "error");
    }

    #[test]
    fn completions_parses_shell() {
        let cli = Cli::parse_from(["tversky", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }
}
