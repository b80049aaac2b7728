//! Normalizer configuration
//!
//! The caller owns the file format; these types only derive serde so they
//! can be embedded in whatever configuration the caller loads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::diagnostic::{DEFAULT_PREVIEW_LINES, DEFAULT_PREVIEW_WIDTH};
use super::error::NormalizeError;

/// Which repair passes are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Quote flowchart node labels with non-ASCII or `@`
    pub node_quoting: bool,
    /// Reserved-marker and activation fixes for sequence diagrams
    pub sequence_autofix: bool,
    /// Stereotype stripping for class diagrams
    pub class_autofix: bool,
}

impl Capabilities {
    /// Every pass enabled
    pub fn all() -> Self {
        Self {
            node_quoting: true,
            sequence_autofix: true,
            class_autofix: true,
        }
    }

    /// Every pass disabled; blocks pass through verbatim
    pub fn none() -> Self {
        Self {
            node_quoting: false,
            sequence_autofix: false,
            class_autofix: false,
        }
    }

    /// Passes used for a given output mode
    pub fn for_output(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Html | OutputMode::Epub => Self::all(),
        }
    }

    pub fn with_node_quoting(mut self, enabled: bool) -> Self {
        self.node_quoting = enabled;
        self
    }

    pub fn with_sequence_autofix(mut self, enabled: bool) -> Self {
        self.sequence_autofix = enabled;
        self
    }

    pub fn with_class_autofix(mut self, enabled: bool) -> Self {
        self.class_autofix = enabled;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Target output of the surrounding conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Html,
    Epub,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputMode::Html),
            "epub" => Ok(OutputMode::Epub),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Html => write!(f, "html"),
            OutputMode::Epub => write!(f, "epub"),
        }
    }
}

/// What to do with a block that raised a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the whole document
    Abort,
    /// Keep the original block and record the diagnostic
    #[default]
    KeepOriginal,
    /// Keep the original block and put a warning quote above it
    Annotate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "keep_original" | "keep" => Ok(FailurePolicy::KeepOriginal),
            "annotate" => Ok(FailurePolicy::Annotate),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::KeepOriginal => write!(f, "keep_original"),
            FailurePolicy::Annotate => write!(f, "annotate"),
        }
    }
}

impl FailurePolicy {
    /// Get all valid policy names
    pub fn variants() -> &'static [&'static str] {
        &["abort", "keep_original", "annotate"]
    }
}

/// Full normalizer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub capabilities: Capabilities,
    pub failure_policy: FailurePolicy,
    /// Non-empty diagram lines shown in a diagnostic preview
    pub preview_lines: usize,
    /// Display width of each preview line, 0 for unlimited
    pub preview_width: usize,
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with the passes for `mode`
    pub fn for_output(mode: OutputMode) -> Self {
        Self::default().with_capabilities(Capabilities::for_output(mode))
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_preview(mut self, lines: usize, width: usize) -> Self {
        self.preview_lines = lines;
        self.preview_width = width;
        self
    }

    /// Reject settings that would produce useless diagnostics
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.preview_lines == 0 {
            return Err(NormalizeError::config("preview_lines must be at least 1"));
        }
        Ok(())
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            failure_policy: FailurePolicy::default(),
            preview_lines: DEFAULT_PREVIEW_LINES,
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_builders() {
        let caps = Capabilities::none().with_node_quoting(true);
        assert!(caps.node_quoting);
        assert!(!caps.sequence_autofix);
        assert!(!caps.class_autofix);
        assert_eq!(Capabilities::default(), Capabilities::all());
    }

    #[test]
    fn test_capabilities_for_output() {
        assert_eq!(Capabilities::for_output(OutputMode::Html), Capabilities::all());
        assert_eq!(Capabilities::for_output(OutputMode::Epub), Capabilities::all());
    }

    #[test]
    fn test_output_mode_parsing() {
        assert_eq!(OutputMode::from_str("html").unwrap(), OutputMode::Html);
        assert_eq!(OutputMode::from_str("EPUB").unwrap(), OutputMode::Epub);
        assert!(OutputMode::from_str("pdf").is_err());
        assert_eq!(OutputMode::Epub.to_string(), "epub");
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!(FailurePolicy::from_str("abort").unwrap(), FailurePolicy::Abort);
        assert_eq!(
            FailurePolicy::from_str("keep-original").unwrap(),
            FailurePolicy::KeepOriginal
        );
        assert_eq!(
            FailurePolicy::from_str("Annotate").unwrap(),
            FailurePolicy::Annotate
        );
        assert!(FailurePolicy::from_str("ignore").is_err());
        assert!(FailurePolicy::variants().contains(&"annotate"));
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = NormalizerConfig::default();
        assert_eq!(config.preview_lines, DEFAULT_PREVIEW_LINES);
        assert_eq!(config.failure_policy, FailurePolicy::KeepOriginal);
        assert!(config.validate().is_ok());

        let bad = config.with_preview(0, 80);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_partial_json() {
        let json = r#"{"failure_policy": "annotate", "capabilities": {"class_autofix": false}}"#;
        let config: NormalizerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Annotate);
        assert!(config.capabilities.node_quoting);
        assert!(!config.capabilities.class_autofix);
        assert_eq!(config.preview_lines, DEFAULT_PREVIEW_LINES);
    }
}
