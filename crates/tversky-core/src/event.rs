//! Structured trace events emitted by the similarity engine.
//!
//! A [`Trace`] is the ordered record of one computation. Events carry only
//! structured payloads (numbers and element lists); display text lives in
//! [`crate::narrate`], so the trace itself is locale-independent.
//!
//! The JSON shape is internally tagged on `type`:
//!
//! ```json
//! {"type":"calculation","variable":"only_A","value":1}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Payload enums
// ---------------------------------------------------------------------------

/// Which partition count a `calculation` event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "intersection")]
    Intersection,
    #[serde(rename = "only_A")]
    OnlyA,
    #[serde(rename = "only_B")]
    OnlyB,
}

/// Which side an `animate_difference` event isolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetName {
    A,
    B,
}

impl fmt::Display for SetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

// ---------------------------------------------------------------------------
// TraceEvent
// ---------------------------------------------------------------------------

/// One step of the computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The computation begins with these weights.
    Start { alpha: f64, beta: f64 },
    /// Both input sets, sorted.
    ShowSets {
        #[serde(rename = "setA")]
        set_a: Vec<String>,
        #[serde(rename = "setB")]
        set_b: Vec<String>,
    },
    /// The common elements have been found.
    AnimateIntersection { elements: Vec<String> },
    /// A partition count.
    Calculation { variable: Variable, value: usize },
    /// The elements exclusive to one side have been isolated.
    AnimateDifference {
        set_name: SetName,
        elements: Vec<String>,
    },
    /// The Tversky formula is introduced.
    ShowFormula,
    /// The counts are substituted into the formula.
    SubstituteValues,
    /// `intersection + alpha * only_A + beta * only_B`.
    CalculateDenominator {
        value: f64,
        intersection: usize,
        #[serde(rename = "only_A")]
        only_a: usize,
        #[serde(rename = "only_B")]
        only_b: usize,
        alpha: f64,
        beta: f64,
    },
    /// The score, rounded to four decimals for display.
    ///
    /// `degenerate` is set when the denominator is zero and the score is
    /// defined as `0.0`.
    FinalResult {
        value: f64,
        numerator: usize,
        denominator: f64,
        degenerate: bool,
    },
    /// The overlap diagram closes the explanation.
    ShowDiagram,
}

impl TraceEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Start { .. } => EventKind::Start,
            Self::ShowSets { .. } => EventKind::ShowSets,
            Self::AnimateIntersection { .. } => EventKind::AnimateIntersection,
            Self::Calculation { .. } => EventKind::Calculation,
            Self::AnimateDifference { .. } => EventKind::AnimateDifference,
            Self::ShowFormula => EventKind::ShowFormula,
            Self::SubstituteValues => EventKind::SubstituteValues,
            Self::CalculateDenominator { .. } => EventKind::CalculateDenominator,
            Self::FinalResult { .. } => EventKind::FinalResult,
            Self::ShowDiagram => EventKind::ShowDiagram,
        }
    }

    /// Element list carried by this event, if any.
    #[must_use]
    pub fn elements(&self) -> Option<&[String]> {
        match self {
            Self::AnimateIntersection { elements } | Self::AnimateDifference { elements, .. } => {
                Some(elements)
            }
            _ => None,
        }
    }
}

/// Discriminant of a [`TraceEvent`], matching its wire `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    ShowSets,
    AnimateIntersection,
    Calculation,
    AnimateDifference,
    ShowFormula,
    SubstituteValues,
    CalculateDenominator,
    FinalResult,
    ShowDiagram,
}

impl EventKind {
    /// The kinds of every trace, in emission order.
    pub const SEQUENCE: [Self; 13] = [
        Self::Start,
        Self::ShowSets,
        Self::AnimateIntersection,
        Self::Calculation,
        Self::AnimateDifference,
        Self::Calculation,
        Self::AnimateDifference,
        Self::Calculation,
        Self::ShowFormula,
        Self::SubstituteValues,
        Self::CalculateDenominator,
        Self::FinalResult,
        Self::ShowDiagram,
    ];

    /// The wire `type` tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ShowSets => "show_sets",
            Self::AnimateIntersection => "animate_intersection",
            Self::Calculation => "calculation",
            Self::AnimateDifference => "animate_difference",
            Self::ShowFormula => "show_formula",
            Self::SubstituteValues => "substitute_values",
            Self::CalculateDenominator => "calculate_denominator",
            Self::FinalResult => "final_result",
            Self::ShowDiagram => "show_diagram",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// The ordered, immutable event sequence of one computation.
///
/// Only the engine constructs traces; consumers read them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace(Vec<TraceEvent>);

impl Trace {
    pub(crate) const fn from_events(events: Vec<TraceEvent>) -> Self {
        Self(events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEvent> {
        self.0.iter()
    }

    /// Kinds of all events, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> {
        self.0.iter().map(TraceEvent::kind).collect()
    }

    #[must_use]
    pub fn into_events(self) -> Vec<TraceEvent> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEvent;
    type IntoIter = std::slice::Iter<'a, TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
