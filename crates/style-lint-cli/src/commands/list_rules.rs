//! List rules command implementation.

use anyhow::{Context, Result};
use style_lint_core::RuleBox;
use style_lint_rules::{configured_rules, Preset};

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
///
/// Rule settings reflect the resolved configuration.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;
    let rules = configured_rules(&config).context("Invalid rule configuration")?;

    println!("Available rules:\n");
    print!("{}", render(&rules));

    println!("\nPresets:");
    for (name, preset) in [
        ("recommended", Preset::Recommended),
        ("minimal", Preset::Minimal),
    ] {
        println!("  {:<12} - {}", name, preset.rule_names().join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  style-lint check --rules identifier-name,closure-spacing");
    println!("  style-lint correct --rules SL002");

    Ok(())
}

fn render(rules: &[RuleBox]) -> String {
    use std::fmt::Write;

    let mut out = format!(
        "{:<8} {:<18} {:<40} Description\n{}\n",
        "Code",
        "Name",
        "Capabilities",
        "-".repeat(100)
    );
    for rule in rules {
        let description = rule.description();
        let _ = writeln!(
            out,
            "{:<8} {:<18} {:<40} {}",
            description.code,
            description.identifier,
            rule.capabilities().to_string(),
            description.description
        );
        if !description.deprecated_aliases.is_empty() {
            let aliases: Vec<&str> = description.deprecated_aliases.iter().copied().collect();
            let _ = writeln!(out, "{:<8} aliases: {}", "", aliases.join(", "));
        }
        if let Some(configurable) = rule.as_configurable() {
            let _ = writeln!(
                out,
                "{:<8} config: {}",
                "",
                configurable.configuration_description()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_lint_rules::ClosureSpacing;

    #[test]
    fn render_shows_capabilities_and_configuration() {
        let rules: Vec<RuleBox> = vec![Box::new(ClosureSpacing::new())];
        insta::assert_snapshot!(render(&rules).trim_end(), @r"
        Code     Name               Capabilities                             Description
        ----------------------------------------------------------------------------------------------------
        SL002    closure-spacing    validatable, correctable, configurable   Closure expressions should have a single space inside each brace
                 config: severity: warning
        ");
    }
}
