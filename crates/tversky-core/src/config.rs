use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::engine::Weights;
use crate::event::SetName;
use crate::narrate::Locale;

/// Project-level config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "tversky.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TverskyConfig {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub diagram: DiagramConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_weight")]
    pub alpha: f64,
    #[serde(default = "default_weight")]
    pub beta: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            alpha: default_weight(),
            beta: default_weight(),
        }
    }
}

impl WeightsConfig {
    #[must_use]
    pub const fn weights(&self) -> Weights {
        Weights::new(self.alpha, self.beta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    /// Label for set A; the locale's default when absent.
    #[serde(default)]
    pub label_a: Option<String>,
    /// Label for set B; the locale's default when absent.
    #[serde(default)]
    pub label_b: Option<String>,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            output_dir: default_output_dir(),
            url_prefix: default_url_prefix(),
            label_a: None,
            label_b: None,
        }
    }
}

impl DiagramConfig {
    /// Display labels for both sets, falling back to `locale` defaults.
    #[must_use]
    pub fn labels(&self, locale: Locale) -> (String, String) {
        let label_a = self
            .label_a
            .clone()
            .unwrap_or_else(|| locale.set_label(SetName::A).to_string());
        let label_b = self
            .label_b
            .clone()
            .unwrap_or_else(|| locale.set_label(SetName::B).to_string());
        (label_a, label_b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
    /// Preferred output mode (`pretty`, `text`, `json`).
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject negative weights instead of computing with them.
    #[serde(default)]
    pub strict: bool,
}

/// Load and parse one config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`TverskyConfig`].
pub fn load_config_file(path: &Path) -> Result<TverskyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<TverskyConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tversky/config.toml"))
}

/// Resolve the effective config for `project_root`.
///
/// Lookup order: `<project_root>/tversky.toml`, then the user config file,
/// then built-in defaults. The first file found wins; files are not merged.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<TverskyConfig> {
    let project = project_root.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        debug!(path = %project.display(), "loading project config");
        return load_config_file(&project);
    }

    if let Some(user) = user_config_path().filter(|path| path.exists()) {
        debug!(path = %user.display(), "loading user config");
        return load_config_file(&user);
    }

    Ok(TverskyConfig::default())
}

const fn default_true() -> bool {
    true
}

const fn default_weight() -> f64 {
    1.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_url_prefix() -> String {
    "/static".to_string()
}
