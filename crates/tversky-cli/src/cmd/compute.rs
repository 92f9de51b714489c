//! `tversky compute`: score two sets and explain each step.
//!
//! Flags override the loaded config for this invocation only. JSON output is
//! the same success payload the request boundary returns, so scripts can
//! switch between `compute --format json` and `request` freely.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;
use tversky_core::api::{Evaluation, Service, SuccessPayload, WeightValue};
use tversky_core::config::TverskyConfig;
use tversky_core::engine::{Weights, round_for_display};
use tversky_core::error::TverskyError;
use tversky_core::{ElementSet, Locale};

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
#[command(
    about = "Compute the Tversky index of two sets",
    long_about = "Compute the Tversky index of two comma-separated sets.\n\n\
                  Prints every step of the calculation: the partition into shared and\n\
                  exclusive elements, the weighted denominator, and the final score.\n\
                  A Venn diagram is written unless --no-diagram is given.",
    after_help = "EXAMPLES:\n    # Jaccard similarity (alpha = beta = 1)\n    tversky compute -a \"x, y, z\" -b \"y, z, w\"\n\n\
                  # Dice similarity, no diagram\n    tversky compute -a x,y -b y,z --alpha 0.5 --beta 0.5 --no-diagram\n\n\
                  # Persian narration, machine-readable\n    tversky compute -a x -b x --locale fa --format json"
)]
pub struct ComputeArgs {
    /// Elements of set A, comma separated.
    #[arg(short = 'a', long, default_value = "")]
    pub set_a: String,

    /// Elements of set B, comma separated.
    #[arg(short = 'b', long, default_value = "")]
    pub set_b: String,

    /// Weight of elements only in A (default from config, else 1.0).
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Weight of elements only in B (default from config, else 1.0).
    #[arg(long, allow_negative_numbers = true)]
    pub beta: Option<f64>,

    /// Narration language: en or fa.
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Skip writing the Venn diagram.
    #[arg(long)]
    pub no_diagram: bool,

    /// Directory the diagram is written to.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// URL prefix reported for the diagram.
    #[arg(long, value_name = "PREFIX")]
    pub url_prefix: Option<String>,

    /// Reject negative weights.
    #[arg(long)]
    pub strict: bool,
}

impl ComputeArgs {
    /// `config` with this invocation's overrides applied.
    fn effective_config(&self, config: &TverskyConfig) -> TverskyConfig {
        let mut config = config.clone();
        if let Some(locale) = self.locale {
            config.display.locale = locale;
        }
        if self.no_diagram {
            config.diagram.enabled = false;
        }
        if let Some(dir) = &self.out_dir {
            config.diagram.output_dir.clone_from(dir);
        }
        if let Some(prefix) = &self.url_prefix {
            config.diagram.url_prefix.clone_from(prefix);
        }
        if self.strict {
            config.validation.strict = true;
        }
        config
    }

    /// Weights from flags, falling back to config. Non-finite values are rejected.
    fn weights(&self, config: &TverskyConfig) -> Result<Weights, TverskyError> {
        let alpha = WeightValue::Number(self.alpha.unwrap_or(config.weights.alpha));
        let beta = WeightValue::Number(self.beta.unwrap_or(config.weights.beta));
        Ok(Weights::new(alpha.to_f64("alpha")?, beta.to_f64("beta")?))
    }
}

/// Execute `tversky compute`.
///
/// # Errors
///
/// Returns an error if a weight is rejected, the diagram cannot be written,
/// or output rendering fails.
pub fn run_compute(
    args: &ComputeArgs,
    config: &TverskyConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let config = args.effective_config(config);
    let a = ElementSet::parse(&args.set_a);
    let b = ElementSet::parse(&args.set_b);

    let result = args
        .weights(&config)
        .and_then(|weights| Service::from_config(&config).evaluate(&a, &b, weights));

    let evaluation = match result {
        Ok(evaluation) => evaluation,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{err}");
        }
    };
    debug!(score = evaluation.outcome.score, "compute finished");

    let payload = SuccessPayload {
        success: true,
        similarity: evaluation.outcome.score,
        image_url: evaluation.artifact.as_ref().map(|artifact| artifact.url.clone()),
        log: evaluation.log.clone(),
    };

    render_mode(
        output,
        &payload,
        |_, w| render_compute_text(&evaluation, w),
        |_, w| render_compute_pretty(&a, &b, &evaluation, w),
    )
}

fn render_compute_text(evaluation: &Evaluation, w: &mut dyn Write) -> std::io::Result<()> {
    let outcome = &evaluation.outcome;
    writeln!(w, "similarity\t{}", outcome.score)?;
    writeln!(w, "intersection\t{}", outcome.intersection_size)?;
    writeln!(w, "only_A\t{}", outcome.only_a_size)?;
    writeln!(w, "only_B\t{}", outcome.only_b_size)?;
    writeln!(w, "denominator\t{}", outcome.denominator)?;
    match &evaluation.artifact {
        Some(artifact) => writeln!(w, "image\t{}", artifact.url)?,
        None => writeln!(w, "image\t-")?,
    }
    for record in &evaluation.log {
        writeln!(w, "{}\t{}", record.event.kind().as_str(), record.text)?;
    }
    Ok(())
}

fn render_compute_pretty(
    a: &ElementSet,
    b: &ElementSet,
    evaluation: &Evaluation,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let outcome = &evaluation.outcome;
    pretty_section(w, "Tversky similarity")?;
    pretty_kv(w, "Set A", a.to_string())?;
    pretty_kv(w, "Set B", b.to_string())?;
    pretty_kv(
        w,
        "Weights",
        format!("alpha={} beta={}", outcome.weights.alpha, outcome.weights.beta),
    )?;
    pretty_kv(w, "Score", format!("{:.4}", round_for_display(outcome.score)))?;
    if outcome.is_degenerate() {
        pretty_kv(w, "Note", "denominator is zero, score defaults to 0")?;
    }
    if let Some(artifact) = &evaluation.artifact {
        pretty_kv(w, "Diagram", artifact.path.display().to_string())?;
    }

    writeln!(w)?;
    pretty_section(w, "Steps")?;
    for (step, record) in evaluation.log.iter().enumerate() {
        writeln!(w, "{:>2}. {}", step + 1, record.text)?;
    }
    Ok(())
}
