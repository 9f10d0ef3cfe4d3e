//! Core types for violations, corrections and results.

use crate::description::RuleDescription;

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for violations. `Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
///
/// Carries both the byte offset used internally and the character offset
/// used for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path, if the buffer came from disk.
    pub file: Option<PathBuf>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number in characters (1-indexed).
    pub column: usize,
    /// Byte offset in the file.
    pub offset: usize,
    /// Character offset in the file.
    pub character: usize,
}

impl Location {
    /// Creates a new location with explicit line and column.
    #[must_use]
    pub fn new(file: Option<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            character: 0,
        }
    }

    /// Sets the byte and character offsets.
    #[must_use]
    pub fn with_offsets(mut self, offset: usize, character: usize) -> Self {
        self.offset = offset;
        self.character = character;
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.column),
            None => write!(f, "<input>:{}:{}", self.line, self.column),
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A rule breach found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule identifier (e.g., "identifier-name").
    pub rule: String,
    /// Rule code (e.g., "SL001").
    pub code: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Where the violation starts.
    pub location: Location,
    /// Human-readable reason.
    pub reason: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation for `rule`.
    #[must_use]
    pub fn new(
        rule: &RuleDescription,
        severity: Severity,
        location: Location,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.identifier.to_string(),
            code: rule.code.to_string(),
            severity,
            location,
            reason: reason.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.location);
        let _ = writeln!(output, "  {}: {}", self.severity, self.reason);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }

    /// Converts into a diagnostic that can be rendered against the source.
    #[must_use]
    pub fn to_diagnostic(&self) -> ViolationDiagnostic {
        ViolationDiagnostic::from(self)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.reason
        )
    }
}

/// A violation rendered as a miette diagnostic.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.reason),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, 1)),
            label_message: v.rule.clone(),
        }
    }
}

/// Record of a rewrite applied by a correctable rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Rule identifier.
    pub rule: String,
    /// Rule code.
    pub code: String,
    /// Where the corrected text started before the rewrite.
    pub location: Location,
}

impl Correction {
    /// Creates a new correction record.
    #[must_use]
    pub fn new(rule: &RuleDescription, location: Location) -> Self {
        Self {
            rule: rule.identifier.to_string(),
            code: rule.code.to_string(),
            location,
        }
    }
}

impl std::fmt::Display for Correction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Corrected {}", self.location, self.rule)
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.has_violations_at(Severity::Warning)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        (errors, self.violations.len() - errors)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
    }
}

/// Result of running corrections.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// All corrections applied.
    pub corrections: Vec<Correction>,
    /// Number of files whose contents changed.
    pub files_corrected: usize,
    /// Number of files visited.
    pub files_checked: usize,
}

impl CorrectionReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds corrections from another report.
    pub fn extend(&mut self, other: Self) {
        self.corrections.extend(other.corrections);
        self.files_corrected += other.files_corrected;
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{Category, RuleDescription};

    fn description() -> RuleDescription {
        RuleDescription::new("identifier-name", "SL001", "Identifier Name", Category::Style)
    }

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            &description(),
            severity,
            Location::new(Some(PathBuf::from("src/main.swift")), 42, 10).with_offsets(900, 880),
            "Variable name should start with a lowercase character: 'Foo'",
        )
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn violation_carries_rule_identity() {
        let v = make_violation(Severity::Error);
        assert_eq!(v.rule, "identifier-name");
        assert_eq!(v.code, "SL001");
    }

    #[test]
    fn violation_display() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"src/main.swift:42:10: error [SL001] Variable name should start with a lowercase character: 'Foo'"
        );
    }

    #[test]
    fn violation_format_includes_suggestion() {
        let v = make_violation(Severity::Warning).with_suggestion(Suggestion::new("Rename it"));
        let formatted = v.format();
        assert!(formatted.starts_with("SL001 identifier-name at src/main.swift:42:10"));
        assert!(formatted.contains("= help: Rename it"));
    }

    #[test]
    fn location_without_file() {
        let location = Location::new(None, 1, 3);
        assert_eq!(location.to_string(), "<input>:1:3");
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_warnings());
        result.violations.push(make_violation(Severity::Error));
        assert_eq!(result.count_by_severity(), (1, 1));
        assert_eq!(result.by_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn results_extend() {
        let mut a = LintResult::new();
        a.files_checked = 2;
        let mut b = LintResult::new();
        b.files_checked = 3;
        b.violations.push(make_violation(Severity::Error));
        a.extend(b);
        assert_eq!(a.files_checked, 5);
        assert_eq!(a.violations.len(), 1);
    }
}
