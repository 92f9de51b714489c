//! Request boundary: raw payloads in, response payloads out.
//!
//! A request names two comma-delimited element lists and two optional
//! weights. The [`Service`] parses them, runs the engine, renders the
//! diagram, and narrates the trace. Any failure along that path is caught
//! once, in [`Service::handle`], and turned into a single
//! [`CalculateResponse::Failure`]; there is no partial success.
//!
//! ```json
//! {"setA": "x, y, z", "setB": "y, z, w", "alpha": 1, "beta": "0.5"}
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::config::TverskyConfig;
use crate::diagram::{DiagramArtifact, DiagramRenderer, DiagramRequest, SvgRenderer};
use crate::engine::{self, TverskyOutcome, Weights};
use crate::error::TverskyError;
use crate::narrate::{Locale, LogRecord};
use crate::set::ElementSet;

/// Weight used when a request omits one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A weight as sent by a client: a JSON number or a numeric string.
///
/// An explicit `null` is kept so it can be rejected rather than defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightValue {
    Number(f64),
    Text(String),
    Null,
}

impl WeightValue {
    /// Read the weight as a finite number.
    ///
    /// # Errors
    ///
    /// Returns [`TverskyError::InvalidWeight`] for `null`, non-numeric text
    /// and non-finite values (`inf`, `NaN`).
    pub fn to_f64(&self, name: &'static str) -> Result<f64, TverskyError> {
        let value = match self {
            Self::Null => {
                return Err(TverskyError::InvalidWeight {
                    name,
                    raw: "null".to_string(),
                });
            }
            Self::Number(value) => *value,
            Self::Text(raw) => raw.trim().parse::<f64>().map_err(|_| TverskyError::InvalidWeight {
                name,
                raw: raw.clone(),
            })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(TverskyError::InvalidWeight {
                name,
                raw: value.to_string(),
            })
        }
    }
}

/// The calculation request payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(rename = "setA", default)]
    pub set_a: String,
    #[serde(rename = "setB", default)]
    pub set_b: String,
    /// `None` only when the field is absent.
    #[serde(default, deserialize_with = "present_weight")]
    pub alpha: Option<WeightValue>,
    #[serde(default, deserialize_with = "present_weight")]
    pub beta: Option<WeightValue>,
}

/// A field that is present, even as `null`, deserializes to `Some`.
fn present_weight<'de, D>(deserializer: D) -> Result<Option<WeightValue>, D::Error>
where
    D: Deserializer<'de>,
{
    WeightValue::deserialize(deserializer).map(Some)
}

impl CalculateRequest {
    /// Parse a request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`TverskyError::MalformedRequest`] if the text is not a JSON
    /// object of the expected shape.
    pub fn from_json(text: &str) -> Result<Self, TverskyError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Both element sets, parsed.
    #[must_use]
    pub fn sets(&self) -> (ElementSet, ElementSet) {
        (ElementSet::parse(&self.set_a), ElementSet::parse(&self.set_b))
    }

    /// Both weights, with [`DEFAULT_WEIGHT`] for missing ones.
    ///
    /// # Errors
    ///
    /// Returns [`TverskyError::InvalidWeight`] if a weight is present but not
    /// a finite number.
    pub fn weights(&self) -> Result<Weights, TverskyError> {
        self.weights_or(Weights::new(DEFAULT_WEIGHT, DEFAULT_WEIGHT))
    }

    /// Both weights, taking missing ones from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`TverskyError::InvalidWeight`] if a weight is present but not
    /// a finite number.
    pub fn weights_or(&self, defaults: Weights) -> Result<Weights, TverskyError> {
        let read = |value: Option<&WeightValue>, name, default| {
            value.map_or(Ok(default), |value| value.to_f64(name))
        };
        Ok(Weights::new(
            read(self.alpha.as_ref(), "alpha", defaults.alpha)?,
            read(self.beta.as_ref(), "beta", defaults.beta)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessPayload {
    pub success: bool,
    pub similarity: f64,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub log: Vec<LogRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailurePayload {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

/// What the boundary returns for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculateResponse {
    Success(SuccessPayload),
    Failure(FailurePayload),
}

impl CalculateResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    fn failure(err: &TverskyError) -> Self {
        Self::Failure(FailurePayload {
            success: false,
            error: format!("Error: {err}"),
            error_code: err.error_code().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Read-only settings shared by every request a [`Service`] handles.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Weights used when a request omits one.
    pub default_weights: Weights,
    pub locale: Locale,
    /// Reject negative weights.
    pub strict: bool,
    pub label_a: String,
    pub label_b: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&TverskyConfig::default())
    }
}

impl ServiceSettings {
    #[must_use]
    pub fn from_config(config: &TverskyConfig) -> Self {
        let (label_a, label_b) = config.diagram.labels(config.display.locale);
        Self {
            default_weights: config.weights.weights(),
            locale: config.display.locale,
            strict: config.validation.strict,
            label_a,
            label_b,
        }
    }
}

/// One full evaluation: the engine outcome, the stored diagram (if any),
/// and the narrated trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub outcome: TverskyOutcome,
    pub artifact: Option<DiagramArtifact>,
    pub log: Vec<LogRecord>,
}

/// Runs requests end to end.
///
/// Holds no per-request state: the same service can handle any number of
/// requests, from any number of threads.
pub struct Service {
    settings: ServiceSettings,
    renderer: Option<Box<dyn DiagramRenderer>>,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("settings", &self.settings)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl Service {
    /// A service with explicit settings and an optional renderer.
    #[must_use]
    pub fn new(settings: ServiceSettings, renderer: Option<Box<dyn DiagramRenderer>>) -> Self {
        Self { settings, renderer }
    }

    /// A service configured from `config`, rendering SVG diagrams when
    /// `diagram.enabled` is set.
    #[must_use]
    pub fn from_config(config: &TverskyConfig) -> Self {
        let renderer: Option<Box<dyn DiagramRenderer>> = config.diagram.enabled.then(|| {
            Box::new(SvgRenderer::new(
                config.diagram.output_dir.clone(),
                config.diagram.url_prefix.clone(),
            )) as Box<dyn DiagramRenderer>
        });
        Self::new(ServiceSettings::from_config(config), renderer)
    }

    #[must_use]
    pub const fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Handle a JSON request body.
    #[must_use]
    pub fn handle_json(&self, body: &str) -> CalculateResponse {
        match CalculateRequest::from_json(body) {
            Ok(request) => self.handle(&request),
            Err(err) => {
                warn!(error = %err, "rejecting request");
                CalculateResponse::failure(&err)
            }
        }
    }

    /// Handle a parsed request. Never panics and never returns a partial
    /// result.
    #[must_use]
    pub fn handle(&self, request: &CalculateRequest) -> CalculateResponse {
        let result = request.weights_or(self.settings.default_weights).and_then(|weights| {
            let (a, b) = request.sets();
            self.evaluate(&a, &b, weights)
        });

        match result {
            Ok(evaluation) => CalculateResponse::Success(SuccessPayload {
                success: true,
                similarity: evaluation.outcome.score,
                image_url: evaluation.artifact.map(|artifact| artifact.url),
                log: evaluation.log,
            }),
            Err(err) => {
                warn!(error = %err, code = err.error_code(), "request failed");
                CalculateResponse::failure(&err)
            }
        }
    }

    /// Validate weights, compute, render and narrate.
    ///
    /// # Errors
    ///
    /// Returns [`TverskyError::NegativeWeight`] in strict mode, or
    /// [`TverskyError::Render`] if the diagram cannot be stored.
    pub fn evaluate(
        &self,
        a: &ElementSet,
        b: &ElementSet,
        weights: Weights,
    ) -> Result<Evaluation, TverskyError> {
        if self.settings.strict {
            validate_weights(weights)?;
        }

        let outcome = engine::compute(a, b, weights);
        debug!(score = outcome.score, "evaluation computed");

        let artifact = match &self.renderer {
            Some(renderer) => {
                let request = DiagramRequest::from_outcome(
                    &outcome,
                    self.settings.label_a.clone(),
                    self.settings.label_b.clone(),
                );
                Some(renderer.render(&request)?)
            }
            None => None,
        };

        let log = outcome.trace.narrated(self.settings.locale);
        Ok(Evaluation {
            outcome,
            artifact,
            log,
        })
    }
}

/// Reject negative weights.
///
/// # Errors
///
/// Returns [`TverskyError::NegativeWeight`] naming the first offending weight.
pub fn validate_weights(weights: Weights) -> Result<(), TverskyError> {
    for (name, value) in [("alpha", weights.alpha), ("beta", weights.beta)] {
        if value < 0.0 {
            return Err(TverskyError::NegativeWeight { name, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::RenderError;
    use crate::event::EventKind;
    use serde_json::{Value, json};
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records requests instead of writing files.
    #[derive(Default)]
    struct RecordingRenderer {
        seen: Mutex<Vec<DiagramRequest>>,
    }

    impl DiagramRenderer for RecordingRenderer {
        fn render(&self, request: &DiagramRequest) -> Result<DiagramArtifact, RenderError> {
            let mut seen = self.seen.lock().expect("lock poisoned");
            seen.push(request.clone());
            Ok(DiagramArtifact {
                path: PathBuf::from(format!("mem/{}.svg", seen.len())),
                url: format!("/static/{}.svg", seen.len()),
            })
        }
    }

    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn render(&self, _request: &DiagramRequest) -> Result<DiagramArtifact, RenderError> {
            Err(RenderError::Write {
                path: PathBuf::from("/nowhere/venn.svg"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    fn service_without_diagram() -> Service {
        Service::new(ServiceSettings::default(), None)
    }

    fn to_json(response: &CalculateResponse) -> Value {
        serde_json::to_value(response).expect("serialize response")
    }

    #[test]
    fn weights_default_to_one() {
        let request = CalculateRequest {
            set_a: "a".into(),
            set_b: "a".into(),
            ..CalculateRequest::default()
        };
        assert_eq!(request.weights().expect("weights"), Weights::jaccard());
    }

    #[test]
    fn weights_accept_numbers_and_numeric_strings() {
        let request =
            CalculateRequest::from_json(r#"{"setA":"a","setB":"b","alpha":0.25,"beta":" 2 "}"#)
                .expect("parse");
        assert_eq!(request.weights().expect("weights"), Weights::new(0.25, 2.0));
    }

    #[test]
    fn non_numeric_weight_is_invalid() {
        let request = CalculateRequest::from_json(r#"{"setA":"a","setB":"b","alpha":"heavy"}"#)
            .expect("parse");
        let err = request.weights().expect_err("must fail");
        assert!(matches!(err, TverskyError::InvalidWeight { name: "alpha", .. }));
    }

    #[test]
    fn non_finite_weight_is_invalid() {
        let request =
            CalculateRequest::from_json(r#"{"setA":"a","setB":"b","beta":"NaN"}"#).expect("parse");
        assert!(matches!(
            request.weights(),
            Err(TverskyError::InvalidWeight { name: "beta", .. })
        ));
    }

    #[test]
    fn null_weight_is_invalid_not_defaulted() {
        let request =
            CalculateRequest::from_json(r#"{"setA":"a","setB":"b","alpha":null}"#).expect("parse");
        assert_eq!(request.alpha, Some(WeightValue::Null));
        assert!(request.beta.is_none());

        let response = service_without_diagram()
            .handle_json(r#"{"setA":"x,y","setB":"y,z","alpha":null}"#);
        let value = to_json(&response);
        assert_eq!(value["success"], false);
        assert_eq!(value["error_code"], "E2002");
        assert!(value["error"].as_str().expect("error text").contains("alpha"));
    }

    #[test]
    fn missing_weights_come_from_configured_defaults() {
        let mut config = TverskyConfig::default();
        config.weights.alpha = 0.5;
        config.weights.beta = 0.5;
        config.diagram.enabled = false;
        let service = Service::from_config(&config);
        assert_eq!(service.settings().default_weights, Weights::dice());

        // Dice: 1 / (1 + 0.5 + 0.5)
        let value = to_json(&service.handle_json(r#"{"setA":"a,b","setB":"b,c"}"#));
        assert_eq!(value["similarity"], 0.5);

        // An explicit weight still wins over the default.
        let value =
            to_json(&service.handle_json(r#"{"setA":"a,b","setB":"b,c","alpha":1,"beta":1}"#));
        assert!((value["similarity"].as_f64().expect("number") - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn success_payload_shape() {
        let response = service_without_diagram().handle_json(
            r#"{"setA":"x, y, z","setB":"y, z, w","alpha":1,"beta":1}"#,
        );
        assert!(response.is_success());
        let value = to_json(&response);
        assert_eq!(value["success"], true);
        assert_eq!(value["similarity"], 0.5);
        assert_eq!(value["imageUrl"], Value::Null);
        let log = value["log"].as_array().expect("log array");
        assert_eq!(log.len(), EventKind::SEQUENCE.len());
        assert_eq!(log[0]["type"], "start");
        assert_eq!(log[2]["elements"], json!(["y", "z"]));
        assert!(log.iter().all(|record| record["text"].is_string()));
    }

    #[test]
    fn renderer_receives_region_sizes_and_labels() {
        let renderer = std::sync::Arc::new(RecordingRenderer::default());
        struct Shared(std::sync::Arc<RecordingRenderer>);
        impl DiagramRenderer for Shared {
            fn render(&self, request: &DiagramRequest) -> Result<DiagramArtifact, RenderError> {
                self.0.render(request)
            }
        }

        let service = Service::new(
            ServiceSettings::default(),
            Some(Box::new(Shared(renderer.clone()))),
        );
        let response = service.handle_json(r#"{"setA":"a,b,c","setB":"c,d"}"#);
        let value = to_json(&response);
        assert_eq!(value["imageUrl"], "/static/1.svg");

        let seen = renderer.seen.lock().expect("lock poisoned");
        assert_eq!(
            seen.as_slice(),
            &[DiagramRequest {
                only_a: 2,
                only_b: 1,
                intersection: 1,
                label_a: "Set A".into(),
                label_b: "Set B".into(),
            }]
        );
    }

    #[test]
    fn malformed_json_is_a_single_failure() {
        let response = service_without_diagram().handle_json("{not json");
        assert!(!response.is_success());
        let value = to_json(&response);
        assert_eq!(value["success"], false);
        assert_eq!(value["error_code"], "E2001");
        assert!(value.get("log").is_none());
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let response = service_without_diagram().handle_json(r#"{"setA":["a"],"setB":"b"}"#);
        assert_eq!(to_json(&response)["error_code"], "E2001");
    }

    #[test]
    fn invalid_weight_failure_mentions_the_value() {
        let response =
            service_without_diagram().handle_json(r#"{"setA":"a","setB":"a","beta":"much"}"#);
        let value = to_json(&response);
        assert_eq!(value["error_code"], "E2002");
        assert!(value["error"].as_str().expect("error text").contains("much"));
    }

    #[test]
    fn render_failure_is_not_a_partial_success() {
        let service = Service::new(ServiceSettings::default(), Some(Box::new(FailingRenderer)));
        let response = service.handle_json(r#"{"setA":"a","setB":"a"}"#);
        let value = to_json(&response);
        assert_eq!(value["success"], false);
        assert_eq!(value["error_code"], "E5001");
        assert!(value.get("similarity").is_none());
    }

    #[test]
    fn permissive_mode_allows_negative_weights() {
        let response =
            service_without_diagram().handle_json(r#"{"setA":"a,b","setB":"a","alpha":-0.5}"#);
        let value = to_json(&response);
        assert_eq!(value["success"], true);
        assert_eq!(value["similarity"], 2.0);
    }

    #[test]
    fn strict_mode_rejects_negative_weights() {
        let settings = ServiceSettings {
            strict: true,
            ..ServiceSettings::default()
        };
        let service = Service::new(settings, None);
        let response = service.handle_json(r#"{"setA":"a","setB":"a","beta":-1}"#);
        let value = to_json(&response);
        assert_eq!(value["error_code"], "E2003");
        assert!(value["error"].as_str().expect("error text").contains("beta"));
    }

    #[test]
    fn missing_sets_are_empty() {
        let response = service_without_diagram().handle_json("{}");
        let value = to_json(&response);
        assert_eq!(value["success"], true);
        assert_eq!(value["similarity"], 0.0);
    }

    #[test]
    fn persian_locale_narrates_in_persian() {
        let settings = ServiceSettings {
            locale: Locale::Fa,
            ..ServiceSettings::default()
        };
        let service = Service::new(settings, None);
        let value = to_json(&service.handle_json(r#"{"setA":"a","setB":"b"}"#));
        let first = value["log"][0]["text"].as_str().expect("text");
        assert!(first.contains("شروع"));
    }

    #[test]
    fn from_config_respects_disabled_diagrams() {
        let mut config = TverskyConfig::default();
        config.diagram.enabled = false;
        let service = Service::from_config(&config);
        let evaluation = service
            .evaluate(
                &ElementSet::parse("a"),
                &ElementSet::parse("a"),
                Weights::jaccard(),
            )
            .expect("evaluate");
        assert!(evaluation.artifact.is_none());
        assert_eq!(evaluation.log.len(), evaluation.outcome.trace.len());
    }

    #[test]
    fn validate_weights_names_first_negative() {
        let err = validate_weights(Weights::new(-1.0, -2.0)).expect_err("must fail");
        assert_eq!(err.to_string(), "alpha must be >= 0, got -1");
        assert!(validate_weights(Weights::new(0.0, 3.0)).is_ok());
    }
}
