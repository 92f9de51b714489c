use std::fmt;

use crate::diagram::RenderError;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    MalformedRequest,
    InvalidWeight,
    NegativeWeight,
    DiagramRenderFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1002",
            Self::MalformedRequest => "E2001",
            Self::InvalidWeight => "E2002",
            Self::NegativeWeight => "E2003",
            Self::DiagramRenderFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::MalformedRequest => "Malformed request payload",
            Self::InvalidWeight => "Weight is not a finite number",
            Self::NegativeWeight => "Weight is negative",
            Self::DiagramRenderFailed => "Diagram rendering failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in tversky.toml and retry."),
            Self::MalformedRequest => {
                Some("Send a JSON object with string fields setA and setB.")
            }
            Self::InvalidWeight => Some("Pass alpha and beta as finite numbers, e.g. 0.5."),
            Self::NegativeWeight => {
                Some("Use weights >= 0, or disable strict validation to allow them.")
            }
            Self::DiagramRenderFailed => {
                Some("Check that the diagram output directory is writable.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised at the request boundary.
///
/// The engine itself never fails; everything here comes from turning raw
/// input into engine arguments or from rendering the diagram.
#[derive(Debug, thiserror::Error)]
pub enum TverskyError {
    /// The payload was not valid JSON or had the wrong shape.
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    /// A weight could not be read as a finite number.
    #[error("could not convert {name} to a number: '{raw}'")]
    InvalidWeight { name: &'static str, raw: String },

    /// A weight was negative while strict validation is enabled.
    #[error("{name} must be >= 0, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    /// Writing the overlap diagram failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl TverskyError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedRequest(_) => ErrorCode::MalformedRequest,
            Self::InvalidWeight { .. } => ErrorCode::InvalidWeight,
            Self::NegativeWeight { .. } => ErrorCode::NegativeWeight,
            Self::Render(_) => ErrorCode::DiagramRenderFailed,
        }
    }

    /// Stable `E####` identifier.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.code().code()
    }

    /// Remediation hint, falling back to the generic one.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.code()
            .hint()
            .or_else(|| ErrorCode::InternalUnexpected.hint())
            .unwrap_or_default()
            .to_string()
    }
}
