//! Configuration types for style-lint.

use crate::types::Severity;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Top-level configuration for style-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule identifier.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Finds the configuration of a rule under any of its identifiers.
    pub fn rule_config<'a, I>(&self, identifiers: I) -> Option<&RuleConfig>
    where
        I: IntoIterator<Item = &'a str>,
    {
        identifiers.into_iter().find_map(|id| self.rules.get(id))
    }

    /// Checks if a rule is enabled under any of its identifiers. Rules
    /// without an `enabled` key are enabled.
    #[must_use]
    pub fn is_rule_enabled<'a, I>(&self, identifiers: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.rule_config(identifiers)
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// File extensions to analyze.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of files processed concurrently.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            extensions: default_extensions(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/build/**".to_string(), "**/Pods/**".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec!["swift".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity for rules with a single severity.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Deserializes an option into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is present but has the wrong shape.
    pub fn option<T: serde::de::DeserializeOwned>(
        &self,
        rule: &str,
        key: &str,
    ) -> Result<Option<T>, ConfigError> {
        self.options
            .get(key)
            .map(|v| {
                v.clone()
                    .try_into()
                    .map_err(|e: toml::de::Error| ConfigError::InvalidOption {
                        rule: rule.to_string(),
                        key: key.to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()
    }

}

/// Warning and error thresholds for one measured quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityLevels {
    /// Threshold producing a warning.
    pub warning: usize,
    /// Threshold producing an error.
    pub error: usize,
}

/// Configuration for rules that only expose a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityConfiguration {
    /// Severity of every violation.
    pub severity: Severity,
}

impl SeverityConfiguration {
    /// Creates a configuration with the given severity.
    #[must_use]
    pub const fn new(severity: Severity) -> Self {
        Self { severity }
    }

    /// Reads the `severity` key, falling back to `default`.
    #[must_use]
    pub fn from_rule_config(config: Option<&RuleConfig>, default: Severity) -> Self {
        Self::new(config.and_then(|c| c.severity).unwrap_or(default))
    }
}

impl std::fmt::Display for SeverityConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "severity: {}", self.severity)
    }
}

/// Tunables for identifier naming rules.
///
/// Construction guarantees
/// `min_length.error <= min_length.warning <= max_length.warning <= max_length.error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConfiguration {
    min_length: SeverityLevels,
    max_length: SeverityLevels,
    excluded: BTreeSet<String>,
    allowed_symbols: BTreeSet<char>,
    validates_start_with_lowercase: bool,
}

impl Default for NameConfiguration {
    fn default() -> Self {
        Self {
            min_length: SeverityLevels {
                warning: 3,
                error: 2,
            },
            max_length: SeverityLevels {
                warning: 40,
                error: 60,
            },
            excluded: BTreeSet::from(["id".to_string()]),
            allowed_symbols: BTreeSet::new(),
            validates_start_with_lowercase: true,
        }
    }
}

impl NameConfiguration {
    /// Creates a configuration, checking threshold ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThresholds`] if the thresholds are not
    /// ordered.
    pub fn new(
        min_length: SeverityLevels,
        max_length: SeverityLevels,
        excluded: impl IntoIterator<Item = String>,
        allowed_symbols: impl IntoIterator<Item = char>,
        validates_start_with_lowercase: bool,
    ) -> Result<Self, ConfigError> {
        let ordered = min_length.error <= min_length.warning
            && min_length.warning <= max_length.warning
            && max_length.warning <= max_length.error;
        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                min_error: min_length.error,
                min_warning: min_length.warning,
                max_warning: max_length.warning,
                max_error: max_length.error,
            });
        }
        Ok(Self {
            min_length,
            max_length,
            excluded: excluded.into_iter().collect(),
            allowed_symbols: allowed_symbols.into_iter().collect(),
            validates_start_with_lowercase,
        })
    }

    /// Builds a configuration from rule options, using defaults for missing
    /// keys.
    ///
    /// Recognized keys: `min_length`, `max_length` (tables with `warning`
    /// and `error`), `excluded`, `allowed_symbols` (strings; every character
    /// counts), `validates_start_with_lowercase`.
    ///
    /// # Errors
    ///
    /// Returns an error if an option is malformed or thresholds are not
    /// ordered.
    pub fn from_rule_config(rule: &str, config: Option<&RuleConfig>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let Some(config) = config else {
            return Ok(defaults);
        };

        let min_length = config
            .option(rule, "min_length")?
            .unwrap_or(defaults.min_length);
        let max_length = config
            .option(rule, "max_length")?
            .unwrap_or(defaults.max_length);
        let excluded: Vec<String> = config
            .option(rule, "excluded")?
            .unwrap_or_else(|| defaults.excluded.iter().cloned().collect());
        let allowed_symbols: Vec<String> = config.option(rule, "allowed_symbols")?.unwrap_or_default();
        let validates = config
            .option(rule, "validates_start_with_lowercase")?
            .unwrap_or(defaults.validates_start_with_lowercase);

        Self::new(
            min_length,
            max_length,
            excluded,
            allowed_symbols.iter().flat_map(|s| s.chars()),
            validates,
        )
    }

    /// Minimum length thresholds.
    #[must_use]
    pub fn min_length(&self) -> SeverityLevels {
        self.min_length
    }

    /// Maximum length thresholds.
    #[must_use]
    pub fn max_length(&self) -> SeverityLevels {
        self.max_length
    }

    /// Names that are never reported.
    #[must_use]
    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Non-alphanumeric characters accepted in names.
    #[must_use]
    pub fn allowed_symbols(&self) -> &BTreeSet<char> {
        &self.allowed_symbols
    }

    /// Whether names must start with a lowercase character.
    #[must_use]
    pub fn validates_start_with_lowercase(&self) -> bool {
        self.validates_start_with_lowercase
    }

    /// Whether `name` is excluded from checking.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    /// Whether `c` is an allowed symbol.
    #[must_use]
    pub fn is_allowed_symbol(&self, c: char) -> bool {
        self.allowed_symbols.contains(&c)
    }

    /// Maps a name length to a severity, or `None` if it is acceptable.
    #[must_use]
    pub fn severity_for_length(&self, length: usize) -> Option<Severity> {
        if length < self.min_length.error || length > self.max_length.error {
            Some(Severity::Error)
        } else if length < self.min_length.warning || length > self.max_length.warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }
}

impl std::fmt::Display for NameConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let excluded: Vec<&str> = self.excluded.iter().map(String::as_str).collect();
        let symbols: String = self.allowed_symbols.iter().collect();
        write!(
            f,
            "min_length: (warning: {}, error: {}), max_length: (warning: {}, error: {}), \
             excluded: [{}], allowed_symbols: \"{}\", validates_start_with_lowercase: {}",
            self.min_length.warning,
            self.min_length.error,
            self.max_length.warning,
            self.max_length.error,
            excluded.join(", "),
            symbols,
            self.validates_start_with_lowercase,
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule option has the wrong shape.
    #[error("Invalid option `{key}` for rule {rule}: {message}")]
    InvalidOption {
        /// Rule identifier.
        rule: String,
        /// Option key.
        key: String,
        /// Deserialization error message.
        message: String,
    },

    /// Length thresholds are not ordered.
    #[error(
        "Length thresholds must satisfy min error ({min_error}) <= min warning ({min_warning}) \
         <= max warning ({max_warning}) <= max error ({max_error})"
    )]
    InvalidThresholds {
        /// Minimum length producing an error.
        min_error: usize,
        /// Minimum length producing a warning.
        min_warning: usize,
        /// Maximum length producing a warning.
        max_warning: usize,
        /// Maximum length producing an error.
        max_error: usize,
    },

    /// Unknown rule identifier.
    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    /// Unknown preset name.
    #[error("Unknown preset: {0} (expected recommended or minimal)")]
    UnknownPreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(config.analyzer.extensions, vec!["swift"]);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "minimal"

[analyzer]
root = "./Sources"
exclude = ["**/generated/**"]
parallelism = 2

[rules.closure-spacing]
enabled = false
severity = "error"

[rules.identifier-name]
min_length = { warning = 4, error = 1 }
excluded = ["id", "x"]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("minimal"));
        assert_eq!(config.analyzer.root, PathBuf::from("./Sources"));
        assert_eq!(config.analyzer.parallelism, Some(2));
        assert!(!config.is_rule_enabled(["closure-spacing"]));
        assert!(config.is_rule_enabled(["identifier-name"]));

        let spacing = SeverityConfiguration::from_rule_config(
            config.rules.get("closure-spacing"),
            Severity::Warning,
        );
        assert_eq!(spacing.severity, Severity::Error);

        let names = NameConfiguration::from_rule_config(
            "identifier-name",
            config.rules.get("identifier-name"),
        )
        .expect("valid name configuration");
        assert_eq!(names.min_length(), SeverityLevels { warning: 4, error: 1 });
        assert_eq!(names.max_length(), SeverityLevels { warning: 40, error: 60 });
        assert!(names.is_excluded("x"));
    }

    #[test]
    fn test_rule_config_by_alias() {
        let config = Config::parse("[rules.variable-name]\nenabled = false\n").expect("parse");
        let found = config.rule_config(["identifier-name", "variable-name"]);
        assert_eq!(found.and_then(|c| c.enabled), Some(false));
    }

    #[test]
    fn test_name_defaults() {
        let names = NameConfiguration::default();
        assert_eq!(names.min_length(), SeverityLevels { warning: 3, error: 2 });
        assert_eq!(names.max_length(), SeverityLevels { warning: 40, error: 60 });
        assert!(names.is_excluded("id"));
        assert!(names.allowed_symbols().is_empty());
        assert!(names.validates_start_with_lowercase());
    }

    #[test]
    fn test_severity_for_length() {
        let names = NameConfiguration::default();
        assert_eq!(names.severity_for_length(1), Some(Severity::Error));
        assert_eq!(names.severity_for_length(2), Some(Severity::Warning));
        assert_eq!(names.severity_for_length(3), None);
        assert_eq!(names.severity_for_length(40), None);
        assert_eq!(names.severity_for_length(41), Some(Severity::Warning));
        assert_eq!(names.severity_for_length(60), Some(Severity::Warning));
        assert_eq!(names.severity_for_length(61), Some(Severity::Error));
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let result = NameConfiguration::new(
            SeverityLevels { warning: 2, error: 3 },
            SeverityLevels { warning: 40, error: 60 },
            Vec::new(),
            Vec::new(),
            true,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidThresholds { min_error: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_option_rejected() {
        let config = Config::parse("[rules.identifier-name]\nmin_length = \"short\"\n")
            .expect("parse");
        let result = NameConfiguration::from_rule_config(
            "identifier-name",
            config.rules.get("identifier-name"),
        );
        assert!(matches!(result, Err(ConfigError::InvalidOption { .. })));
    }

    #[test]
    fn test_mistyped_lowercase_flag_rejected() {
        let config = Config::parse(
            "[rules.identifier-name]\nvalidates_start_with_lowercase = \"no\"\n",
        )
        .expect("parse");
        let result = NameConfiguration::from_rule_config(
            "identifier-name",
            config.rules.get("identifier-name"),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOption { ref key, .. }) if key == "validates_start_with_lowercase"
        ));
    }

    #[test]
    fn test_rule_enabled_under_deprecated_alias() {
        let config = Config::parse("[rules.variable-name]\nenabled = false\n").expect("parse");
        assert!(!config.is_rule_enabled(["identifier-name", "variable-name"]));
        assert!(config.is_rule_enabled(["identifier-name"]));
        assert!(config.is_rule_enabled(["closure-spacing"]));
    }

    #[test]
    fn test_allowed_symbols_split_into_characters() {
        let config = Config::parse("[rules.identifier-name]\nallowed_symbols = [\"_\", \"$%\"]\n")
            .expect("parse");
        let names = NameConfiguration::from_rule_config(
            "identifier-name",
            config.rules.get("identifier-name"),
        )
        .expect("valid");
        assert!(names.is_allowed_symbol('_'));
        assert!(names.is_allowed_symbol('%'));
        assert!(!names.is_allowed_symbol('-'));
    }
}
