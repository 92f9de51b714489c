//! The Tversky similarity engine.
//!
//! ```text
//!                    |A ∩ B|
//! S(A, B) = ─────────────────────────────────
//!           |A ∩ B| + α·|A − B| + β·|B − A|
//! ```
//!
//! α weighs elements found only in A, β elements found only in B. With
//! α = β = 1 this is the Jaccard index; with α = β = 0.5 it is Sørensen–Dice.
//!
//! [`compute`] also returns a [`Trace`] of 13 events in a fixed order, one per
//! step, suitable for progressive presentation. The function is pure: the
//! trace is built locally and returned by value.
//!
//! Weights are not validated here. Negative weights yield scores outside
//! `[0, 1]`; rejecting them is a boundary policy (see
//! [`crate::api::Service`] in strict mode).

#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::{SetName, Trace, TraceEvent, Variable};
use crate::partition::Partition;
use crate::set::ElementSet;

/// Number of events in every trace.
pub const TRACE_LEN: usize = 13;

/// Decimal places kept in the displayed score.
pub const DISPLAY_DECIMALS: i32 = 4;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Asymmetry weights α (only-A penalty) and β (only-B penalty).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub alpha: f64,
    pub beta: f64,
}

impl Weights {
    #[must_use]
    pub const fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// α = β = 1.
    #[must_use]
    pub const fn jaccard() -> Self {
        Self::new(1.0, 1.0)
    }

    /// α = β = 0.5.
    #[must_use]
    pub const fn dice() -> Self {
        Self::new(0.5, 0.5)
    }

    /// α and β exchanged, for comparing B against A.
    #[must_use]
    pub const fn swapped(self) -> Self {
        Self::new(self.beta, self.alpha)
    }

    /// True when both weights are finite and non-negative.
    #[must_use]
    pub fn is_well_formed(self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.alpha >= 0.0 && self.beta >= 0.0
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::jaccard()
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Everything one computation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TverskyOutcome {
    /// Full-precision score; `0.0` when the denominator is zero.
    pub score: f64,
    pub only_a_size: usize,
    pub only_b_size: usize,
    pub intersection_size: usize,
    pub denominator: f64,
    pub weights: Weights,
    pub partition: Partition,
    pub trace: Trace,
}

impl TverskyOutcome {
    /// True when the denominator was zero and the score defaulted to `0.0`.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.denominator == 0.0
    }

    /// The score as displayed in the trace.
    #[must_use]
    pub fn display_score(&self) -> f64 {
        round_for_display(self.score)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the Tversky index of `a` against `b`, with its explanatory trace.
///
/// # Examples
///
/// ```
/// use tversky_core::{ElementSet, Weights, compute};
///
/// let a = ElementSet::parse("a");
/// let b = ElementSet::parse("a");
/// let outcome = compute(&a, &b, Weights::new(2.0, 0.5));
/// assert_eq!(outcome.score, 1.0);
/// assert_eq!(outcome.denominator, 1.0);
/// ```
#[must_use]
pub fn compute(a: &ElementSet, b: &ElementSet, weights: Weights) -> TverskyOutcome {
    let Weights { alpha, beta } = weights;
    let mut events = Vec::with_capacity(TRACE_LEN);

    events.push(TraceEvent::Start { alpha, beta });
    events.push(TraceEvent::ShowSets {
        set_a: a.to_sorted_vec(),
        set_b: b.to_sorted_vec(),
    });

    let partition = Partition::of(a, b);
    let intersection_size = partition.intersection_size();
    let only_a_size = partition.only_a_size();
    let only_b_size = partition.only_b_size();

    events.push(TraceEvent::AnimateIntersection {
        elements: partition.intersection.clone(),
    });
    events.push(TraceEvent::Calculation {
        variable: Variable::Intersection,
        value: intersection_size,
    });

    events.push(TraceEvent::AnimateDifference {
        set_name: SetName::A,
        elements: partition.only_a.clone(),
    });
    events.push(TraceEvent::Calculation {
        variable: Variable::OnlyA,
        value: only_a_size,
    });

    events.push(TraceEvent::AnimateDifference {
        set_name: SetName::B,
        elements: partition.only_b.clone(),
    });
    events.push(TraceEvent::Calculation {
        variable: Variable::OnlyB,
        value: only_b_size,
    });

    events.push(TraceEvent::ShowFormula);
    events.push(TraceEvent::SubstituteValues);

    let denominator = denominator(intersection_size, only_a_size, only_b_size, weights);
    events.push(TraceEvent::CalculateDenominator {
        value: denominator,
        intersection: intersection_size,
        only_a: only_a_size,
        only_b: only_b_size,
        alpha,
        beta,
    });

    let degenerate = denominator == 0.0;
    let score = if degenerate {
        0.0
    } else {
        intersection_size as f64 / denominator
    };
    events.push(TraceEvent::FinalResult {
        value: round_for_display(score),
        numerator: intersection_size,
        denominator,
        degenerate,
    });

    events.push(TraceEvent::ShowDiagram);

    debug!(
        alpha,
        beta,
        intersection_size,
        only_a_size,
        only_b_size,
        denominator,
        score,
        "tversky index computed"
    );

    TverskyOutcome {
        score,
        only_a_size,
        only_b_size,
        intersection_size,
        denominator,
        weights,
        partition,
        trace: Trace::from_events(events),
    }
}

/// The Tversky index alone, without building a trace.
///
/// Agrees exactly with `compute(a, b, weights).score`.
#[must_use]
pub fn tversky_index(a: &ElementSet, b: &ElementSet, weights: Weights) -> f64 {
    let intersection_size = a.intersection(b).count();
    let only_a_size = a.len() - intersection_size;
    let only_b_size = b.len() - intersection_size;
    let denominator = denominator(intersection_size, only_a_size, only_b_size, weights);
    if denominator == 0.0 {
        0.0
    } else {
        intersection_size as f64 / denominator
    }
}

/// Round a score to [`DISPLAY_DECIMALS`] places.
#[must_use]
pub fn round_for_display(score: f64) -> f64 {
    let scale = 10_f64.powi(DISPLAY_DECIMALS);
    (score * scale).round() / scale
}

// The two weighted terms are summed first so that swapping (A, α) with
// (B, β) yields a bit-identical denominator.
#[allow(clippy::suboptimal_flops)]
fn denominator(intersection: usize, only_a: usize, only_b: usize, weights: Weights) -> f64 {
    intersection as f64 + (weights.alpha * only_a as f64 + weights.beta * only_b as f64)
}
