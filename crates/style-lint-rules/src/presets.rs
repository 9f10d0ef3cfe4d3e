//! Rule presets and construction of configured rule sets.

use crate::{closure_spacing, identifier_name, ClosureSpacing, IdentifierName};
use style_lint_core::{Config, ConfigError, RuleBox};
use tracing::debug;

/// Preset configurations for style-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in rule.
    Recommended,
    /// Naming rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Looks up a preset by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Identifiers of the rules in this preset.
    #[must_use]
    pub fn rule_names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &[identifier_name::NAME, closure_spacing::NAME],
            Self::Minimal => &[identifier_name::NAME],
        }
    }

    /// Returns the rules for this preset with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        all_rules()
            .into_iter()
            .filter(|rule| self.rule_names().contains(&rule.description().identifier))
            .collect()
    }
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IdentifierName::new()),
        Box::new(ClosureSpacing::new()),
    ]
}

/// Returns every available rule with its options read from `config`.
///
/// # Errors
///
/// Returns an error if a rule's options are invalid.
pub fn configured_rules(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    Ok(vec![
        Box::new(IdentifierName::from_config(config)?),
        Box::new(ClosureSpacing::from_config(config)),
    ])
}

/// Finds a rule by identifier, deprecated alias or code, configured from
/// `config`.
///
/// # Errors
///
/// Returns an error if the rule is unknown or its options are invalid.
pub fn rule_by_name(name: &str, config: &Config) -> Result<RuleBox, ConfigError> {
    configured_rules(config)?
        .into_iter()
        .find(|rule| rule.description().matches_identifier(name))
        .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
}

/// Builds the rule set described by `config`.
///
/// Starts from the configured preset (default: recommended) and adds any
/// rule outside the preset that is explicitly enabled. Every key under
/// `[rules]` must name a known rule.
///
/// # Errors
///
/// Returns an error for an unknown preset or rule, or invalid options.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = match config.preset.as_deref() {
        Some(name) => {
            Preset::from_name(name).ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?
        }
        None => Preset::Recommended,
    };

    let rules = configured_rules(config)?;
    if let Some(unknown) = config.rules.keys().find(|key| {
        !rules
            .iter()
            .any(|rule| rule.description().matches_identifier(key))
    }) {
        return Err(ConfigError::UnknownRule(unknown.clone()));
    }

    let selected: Vec<RuleBox> = rules
        .into_iter()
        .filter(|rule| {
            let description = rule.description();
            let in_preset = preset.rule_names().contains(&description.identifier);
            let enabled = config
                .rule_config(description.all_identifiers())
                .and_then(|c| c.enabled);
            in_preset || enabled == Some(true)
        })
        .collect();

    debug!("Selected {} rule(s) from {:?} preset", selected.len(), preset);
    Ok(selected)
}
