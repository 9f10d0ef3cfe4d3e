//! Subcommand implementations and the setup they share.

pub mod check;
pub mod correct;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use std::path::Path;
use style_lint_core::{Analyzer, Config, RuleBox};
use style_lint_rules::{rule_by_name, rules_from_config};

use crate::config_resolver::ConfigSource;

/// Loads the configuration a resolved source points to.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Builds an analyzer over `path` with the configured or filtered rules.
pub fn build_analyzer(
    path: &Path,
    config: Config,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
) -> Result<Analyzer> {
    let rules = select_rules(&config, rules_filter)?;

    let mut builder = Analyzer::builder().root(path).excludes(exclude);
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    builder
        .config(config)
        .build()
        .context("Failed to build analyzer")
}

fn select_rules(config: &Config, rules_filter: Option<&str>) -> Result<Vec<RuleBox>> {
    let Some(filter) = rules_filter else {
        return rules_from_config(config).context("Invalid rule configuration");
    };

    let mut rules: Vec<RuleBox> = Vec::new();
    for name in filter.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match rule_by_name(name, config) {
            Ok(rule) => rules.push(rule),
            Err(style_lint_core::ConfigError::UnknownRule(_)) => {
                tracing::warn!("Unknown rule: {}", name);
            }
            Err(e) => return Err(e).with_context(|| format!("Invalid configuration for {name}")),
        }
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn identifiers(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.description().identifier).collect()
    }

    #[test]
    fn filter_selects_by_alias_and_code() {
        let rules = select_rules(&Config::default(), Some("variable-name, SL002"))
            .expect("rules should build");
        assert_eq!(identifiers(&rules), vec!["identifier-name", "closure-spacing"]);
    }

    #[test]
    fn filter_skips_unknown_rules() {
        let rules = select_rules(&Config::default(), Some("nope,closure-spacing"))
            .expect("rules should build");
        assert_eq!(identifiers(&rules), vec!["closure-spacing"]);
    }

    #[test]
    fn no_filter_uses_config_preset() {
        let config = Config::parse("preset = \"minimal\"").expect("config should parse");
        let rules = select_rules(&config, None).expect("rules should build");
        assert_eq!(identifiers(&rules), vec!["identifier-name"]);
    }

    #[test]
    fn load_config_reports_bad_file() {
        let tmp = TempDir::new().expect("temp dir should be created");
        let path = tmp.path().join("style-lint.toml");
        fs::write(&path, "preset = [").expect("config should be written");

        let err = load_config(&ConfigSource::Project(path)).expect_err("config is malformed");
        assert!(err.to_string().starts_with("Failed to load config"));
    }

    #[test]
    fn load_config_defaults_without_file() {
        let config = load_config(&ConfigSource::Default).expect("defaults always load");
        assert!(config.rules.is_empty());
    }
}
