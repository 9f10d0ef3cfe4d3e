//! Shared output formatting for lint and correction results.

use anyhow::Result;
use miette::{NamedSource, Report};
use style_lint_core::{CorrectionReport, LintResult, Severity, Violation};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Fancy => print_fancy(result),
    }
    Ok(())
}

/// Print applied corrections in the specified format.
pub fn print_corrections(report: &CorrectionReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for correction in &report.corrections {
        println!("{correction}");
    }
    if format != OutputFormat::Compact {
        println!(
            "\x1b[32mCorrected {} location(s) in {} of {} file(s)\x1b[0m",
            report.corrections.len(),
            report.files_corrected,
            report.files_checked
        );
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        println!(
            "{} {} at {}",
            violation.code, violation.rule, violation.location
        );
        println!("  {}: {}", severity_indicator, violation.reason);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{}", compact_line(violation));
    }
}

fn compact_line(violation: &Violation) -> String {
    violation.to_string()
}

fn print_fancy(result: &LintResult) {
    for violation in &result.violations {
        let Some(path) = violation.location.file.as_deref() else {
            print!("{}", violation.format());
            continue;
        };
        // Files may have changed since analysis; fall back to plain text.
        match std::fs::read_to_string(path) {
            Ok(source) => {
                let report = Report::new(violation.to_diagnostic())
                    .with_source_code(NamedSource::new(path.display().to_string(), source));
                println!("{report:?}");
            }
            Err(e) => {
                tracing::debug!("Cannot read {} for rendering: {}", path.display(), e);
                print!("{}", violation.format());
            }
        }
    }

    print_summary(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use style_lint_core::Location;

    #[test]
    fn compact_line_has_location_severity_code_and_reason() {
        let violation = Violation {
            rule: "closure-spacing".to_string(),
            code: "SL002".to_string(),
            severity: Severity::Warning,
            location: Location::new(Some(PathBuf::from("App/main.swift")), 3, 11),
            reason: "Closure expressions should have a single space inside each brace".to_string(),
            suggestion: None,
        };
        assert_eq!(
            compact_line(&violation),
            "App/main.swift:3:11: warning [SL002] Closure expressions should have a single space inside each brace"
        );
    }
}
