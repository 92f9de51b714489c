//! Display text for trace events.
//!
//! Narration is presentation: it turns a structured [`TraceEvent`] into one
//! line of prose in a given [`Locale`]. The payloads themselves never change
//! with the locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::DISPLAY_DECIMALS;
use crate::event::{SetName, Trace, TraceEvent, Variable};

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Supported narration languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fa,
}

/// Error returned when parsing an unknown locale tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale '{raw}': expected one of en, fa")]
pub struct UnknownLocale {
    pub raw: String,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::En, Self::Fa];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fa => "fa",
        }
    }

    /// Default diagram label for one side.
    #[must_use]
    pub const fn set_label(self, side: SetName) -> &'static str {
        match (self, side) {
            (Self::En, SetName::A) => "Set A",
            (Self::En, SetName::B) => "Set B",
            (Self::Fa, SetName::A) => "مجموعه A",
            (Self::Fa, SetName::B) => "مجموعه B",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "fa" | "persian" | "farsi" => Ok(Self::Fa),
            _ => Err(UnknownLocale { raw: s.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// LogRecord
// ---------------------------------------------------------------------------

/// A trace event together with its display text.
///
/// Serializes as the event's own fields plus `text`:
/// `{"type":"calculation","variable":"intersection","value":2,"text":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(flatten)]
    pub event: TraceEvent,
    pub text: String,
}

impl Trace {
    /// Pair every event with its narration in `locale`.
    #[must_use]
    pub fn narrated(&self, locale: Locale) -> Vec<LogRecord> {
        self.iter()
            .map(|event| LogRecord {
                text: narrate(event, locale),
                event: event.clone(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Narration
// ---------------------------------------------------------------------------

/// Display line for one event.
#[must_use]
pub fn narrate(event: &TraceEvent, locale: Locale) -> String {
    match locale {
        Locale::En => narrate_en(event),
        Locale::Fa => narrate_fa(event),
    }
}

fn narrate_en(event: &TraceEvent) -> String {
    match event {
        TraceEvent::Start { alpha, beta } => format!(
            "Starting the similarity analysis of the two sets with α={} and β={}.",
            weight(*alpha),
            weight(*beta)
        ),
        TraceEvent::ShowSets { set_a, set_b } => format!(
            "Set A = {} and set B = {}.",
            listing(set_a),
            listing(set_b)
        ),
        TraceEvent::AnimateIntersection { .. } => {
            "1. First, find the elements the two sets share (the intersection).".to_string()
        }
        TraceEvent::Calculation { variable, value } => match variable {
            Variable::Intersection => format!("Shared elements: {value}"),
            Variable::OnlyA => format!("Elements only in A: {value}"),
            Variable::OnlyB => format!("Elements only in B: {value}"),
        },
        TraceEvent::AnimateDifference { set_name, .. } => match set_name {
            SetName::A => "2. Next, set aside the elements that appear only in set A.".to_string(),
            SetName::B => "3. Then set aside the elements that appear only in set B.".to_string(),
        },
        TraceEvent::ShowFormula => "4. Now place the computed counts into the Tversky formula: \
             S = |A∩B| / (|A∩B| + α·|A−B| + β·|B−A|)."
            .to_string(),
        TraceEvent::SubstituteValues => "Substituting the numbers into the formula...".to_string(),
        TraceEvent::CalculateDenominator {
            value,
            intersection,
            only_a,
            only_b,
            alpha,
            beta,
        } => format!(
            "5. First compute the denominator: {intersection} + {}×{only_a} + {}×{only_b} = {}",
            weight(*alpha),
            weight(*beta),
            weight(*value)
        ),
        TraceEvent::FinalResult {
            value,
            numerator,
            denominator,
            degenerate,
        } => {
            if *degenerate {
                "⚠️ The denominator is zero, so the final result is zero.".to_string()
            } else {
                format!(
                    "6. Finally, dividing the numerator by the denominator gives the result: \
                     {numerator} / {} ≈ {}",
                    weight(*denominator),
                    score(*value)
                )
            }
        }
        TraceEvent::ShowDiagram => {
            "Last, the overlap diagram of the two sets summarizes the result.".to_string()
        }
    }
}

fn narrate_fa(event: &TraceEvent) -> String {
    match event {
        TraceEvent::Start { alpha, beta } => format!(
            "▶️ شروع تحلیل شباهت بین دو مجموعه با α={} و β={}.",
            weight(*alpha),
            weight(*beta)
        ),
        TraceEvent::ShowSets { set_a, set_b } => format!(
            "مجموعه A = {} و مجموعه B = {}.",
            listing(set_a),
            listing(set_b)
        ),
        TraceEvent::AnimateIntersection { .. } => {
            "1️⃣ ابتدا اعضای مشترک (اشتراک) را پیدا می‌کنیم.".to_string()
        }
        TraceEvent::Calculation { variable, value } => match variable {
            Variable::Intersection => format!("تعداد اعضای مشترک: {value}"),
            Variable::OnlyA => format!("تعداد اعضای فقط در A: {value}"),
            Variable::OnlyB => format!("تعداد اعضای فقط در B: {value}"),
        },
        TraceEvent::AnimateDifference { set_name, .. } => match set_name {
            SetName::A => "2️⃣ سپس اعضایی که فقط در مجموعه A هستند را جدا می‌کنیم.".to_string(),
            SetName::B => "3️⃣ و بعد اعضایی که فقط در مجموعه B هستند را جدا می‌کنیم.".to_string(),
        },
        TraceEvent::ShowFormula => {
            "4️⃣ اکنون مقادیر محاسبه شده را در فرمول تورسکی قرار می‌دهیم.".to_string()
        }
        TraceEvent::SubstituteValues => "جایگذاری اعداد در فرمول...".to_string(),
        TraceEvent::CalculateDenominator {
            value,
            intersection,
            only_a,
            only_b,
            alpha,
            beta,
        } => format!(
            "5️⃣ ابتدا مخرج کسر را محاسبه می‌کنیم: {intersection} + {}×{only_a} + {}×{only_b} = {}",
            weight(*alpha),
            weight(*beta),
            weight(*value)
        ),
        TraceEvent::FinalResult {
            value,
            numerator,
            denominator,
            degenerate,
        } => {
            if *degenerate {
                "⚠️ چون مخرج صفر است، نتیجه نهایی صفر می‌باشد.".to_string()
            } else {
                format!(
                    "6️⃣ در نهایت با تقسیم صورت بر مخرج، به نتیجه نهایی می‌رسیم: {numerator} / {} ≈ {}",
                    weight(*denominator),
                    score(*value)
                )
            }
        }
        TraceEvent::ShowDiagram => {
            "و در انتها، نمودار ون این دو مجموعه را به عنوان خلاصه مشاهده می‌کنید.".to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Number and list formatting
// ---------------------------------------------------------------------------

/// Shortest round-trip form, always with a fractional part (`1.0`, `0.25`).
fn weight(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn score(value: f64) -> String {
    format!("{value:.prec$}", prec = DISPLAY_DECIMALS.unsigned_abs() as usize)
}

fn listing(elements: &[String]) -> String {
    format!("{{{}}}", elements.join(", "))
}
