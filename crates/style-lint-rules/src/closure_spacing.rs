//! Rule requiring a single space inside closure braces.
//!
//! # Detected Patterns
//!
//! - `{$0}` and `{ $0}`: missing space after `{` or before `}`
//! - `{  $0   }`: more than one space
//!
//! Only braces opened and closed on one line are considered, and braces in
//! comments or string literals are ignored. Empty braces (`{}` and `{ }`)
//! are accepted.
//!
//! # Correction
//!
//! Each offending pair is rewritten as `{ <trimmed content> }`. When pairs
//! nest, only the outermost one is rewritten per pass; running the
//! correction again fixes the inner ones.
//!
//! # Configuration
//!
//! - `severity`: `"warning"` (default) or `"error"`

use std::sync::OnceLock;
use style_lint_core::correction;
use style_lint_core::{
    ByteRange, Category, Config, Configurable, Correctable, Correction, Example, Rule,
    RuleDescription, SeverityConfiguration, Severity, SourceFile, SyntaxModel, Violation,
};
use tracing::debug;

/// Rule code for closure-spacing.
pub const CODE: &str = "SL002";

/// Rule identifier for closure-spacing.
pub const NAME: &str = "closure-spacing";

/// Requires `{ content }` spacing in single-line closures.
#[derive(Debug, Clone, Copy)]
pub struct ClosureSpacing {
    configuration: SeverityConfiguration,
}

impl Default for ClosureSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosureSpacing {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            configuration: SeverityConfiguration::new(Severity::Warning),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.configuration = SeverityConfiguration::new(severity);
        self
    }

    /// Reads the rule's options from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let rule_config = config.rule_config(description().all_identifiers());
        Self {
            configuration: SeverityConfiguration::from_rule_config(rule_config, Severity::Warning),
        }
    }

    /// Ranges from `{` to `}` inclusive of every badly spaced pair, in
    /// ascending order.
    fn violation_ranges(file: &SourceFile, syntax: &SyntaxModel) -> Vec<ByteRange> {
        let mut ranges: Vec<ByteRange> = match_pairs(brace_candidates(file, syntax))
            .into_iter()
            .filter(|range| is_badly_spaced(file, *range))
            .collect();
        ranges.sort();
        ranges
    }
}

impl Rule for ClosureSpacing {
    fn description(&self) -> &'static RuleDescription {
        description()
    }

    fn validate(&self, file: &SourceFile, syntax: &SyntaxModel) -> Vec<Violation> {
        Self::violation_ranges(file, syntax)
            .into_iter()
            .map(|range| {
                Violation::new(
                    description(),
                    self.configuration.severity,
                    file.location(range.location),
                    "Closure expressions should have a single space inside each brace",
                )
            })
            .collect()
    }

    fn as_correctable(&self) -> Option<&dyn Correctable> {
        Some(self)
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

impl Correctable for ClosureSpacing {
    fn correct(&self, file: &mut SourceFile, syntax: &SyntaxModel) -> Vec<Correction> {
        let ranges: Vec<ByteRange> = Self::violation_ranges(file, syntax)
            .into_iter()
            .filter(|range| !file.is_rule_allowed(description(), range.location))
            .collect();
        if ranges.is_empty() {
            return Vec::new();
        }

        let corrections = ranges
            .iter()
            .map(|range| Correction::new(description(), file.location(range.location)))
            .collect();

        let fixable = correction::resolve(&ranges);
        if fixable.len() < ranges.len() {
            debug!(
                "{} nested or overlapping closure(s) left for another pass",
                ranges.len() - fixable.len()
            );
        }
        let fixed = correction::rewrite(file.contents(), &fixable, respace);
        file.write(fixed);

        corrections
    }
}

impl Configurable for ClosureSpacing {
    fn configuration_description(&self) -> String {
        self.configuration.to_string()
    }
}

/// Every `{` and `}` outside comments and strings, in text order.
///
/// On each line only the span from the first `{` to the last `}` after it
/// is scanned; lines without such a span contribute nothing.
fn brace_candidates(file: &SourceFile, syntax: &SyntaxModel) -> Vec<(char, usize)> {
    let mut braces = Vec::new();

    for (line_index, line) in file.lines().iter().enumerate() {
        let text = file.line_text(line);
        let Some(open) = text.find('{') else {
            continue;
        };
        let Some(close) = text.rfind('}').filter(|&close| close > open) else {
            continue;
        };

        let skipped: Vec<ByteRange> = syntax
            .tokens_on_line(line_index)
            .filter(|token| token.kind.is_comment_or_string())
            .map(|token| token.range)
            .collect();

        for (index, c) in text[open..=close].char_indices() {
            if c != '{' && c != '}' {
                continue;
            }
            let brace = ByteRange::new(line.range.location + open + index, 1);
            if !skipped.iter().any(|range| range.intersects(&brace)) {
                braces.push((c, brace.location));
            }
        }
    }

    braces
}

/// Repeatedly takes the first `{` directly followed by `}` in the brace
/// sequence and returns the span of each such pair.
fn match_pairs(mut braces: Vec<(char, usize)>) -> Vec<ByteRange> {
    let mut pairs = Vec::new();
    while let Some(index) = braces
        .windows(2)
        .position(|pair| pair[0].0 == '{' && pair[1].0 == '}')
    {
        let open = braces[index].1;
        let close = braces[index + 1].1;
        pairs.push(ByteRange::new(open, close + 1 - open));
        braces.drain(index..=index + 1);
    }
    pairs
}

fn is_badly_spaced(file: &SourceFile, range: ByteRange) -> bool {
    let Some(content) = file.substring(ByteRange::new(range.location + 1, range.length - 2))
    else {
        return false;
    };
    if content.is_empty() || content == " " {
        return false;
    }
    content != format!(" {} ", trim_spaces(content))
}

/// Rewraps a `{...}` segment as `{ content }`.
fn respace(segment: &str) -> String {
    let content = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(segment);
    format!("{{ {} }}", trim_spaces(content))
}

/// Trims whitespace other than line breaks.
fn trim_spaces(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() && c != '\n' && c != '\r')
}

fn description() -> &'static RuleDescription {
    static DESCRIPTION: OnceLock<RuleDescription> = OnceLock::new();
    DESCRIPTION.get_or_init(|| {
        RuleDescription::new(NAME, CODE, "Closure Spacing", Category::Style)
            .description("Closure expressions should have a single space inside each brace")
            .non_triggering(vec![
                Example::new("[].map ({ $0.description })"),
                Example::new("[].filter { $0.contains(location) }"),
                Example::new("extension UITableViewCell: ReusableView { }"),
                Example::new("extension UITableViewCell: ReusableView {}"),
                Example::new("let pattern = \"{sorted {$0 < $1}}\""),
                Example::new("// items.map {$0}"),
                Example::new("/* {$0} */ items.map { $0 }"),
                Example::new("func run() {\n    items.map { $0 }\n}"),
                Example::new("if ready { } else { }"),
            ])
            .triggering(vec![
                Example::new("[].filter(↓{$0.contains(location)})"),
                Example::new("[].map(↓{$0})"),
                Example::new("(↓{each in return result.contains(where: ↓{e in return e}) }).count"),
                Example::new("filter ↓{sorted ↓{ $0 < $1}}"),
                Example::new("let text = \"{x}\"; items.map ↓{  $0 }"),
            ])
            .corrections(vec![
                (
                    Example::new("[].filter(↓{$0.contains(location)})"),
                    Example::new("[].filter({ $0.contains(location) })"),
                ),
                (Example::new("[].map(↓{$0})"), Example::new("[].map({ $0 })")),
                (
                    Example::new("[].map(↓{  $0.description   })"),
                    Example::new("[].map({ $0.description })"),
                ),
                (
                    Example::new("filter ↓{sorted { $0 < $1}}"),
                    Example::new("filter { sorted { $0 < $1} }"),
                ),
            ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_lint_core::verification::verify_rule;

    fn snapshot(code: &str) -> (SourceFile, SyntaxModel) {
        let file = SourceFile::new(code);
        let syntax = SyntaxModel::lex(&file);
        (file, syntax)
    }

    fn check_code(code: &str) -> Vec<Violation> {
        let (file, syntax) = snapshot(code);
        ClosureSpacing::new().validate(&file, &syntax)
    }

    fn correct_code(code: &str) -> (String, Vec<Correction>) {
        let (mut file, syntax) = snapshot(code);
        let corrections = ClosureSpacing::new().correct(&mut file, &syntax);
        (file.contents().to_string(), corrections)
    }

    #[test]
    fn test_examples() {
        if let Err(failures) = verify_rule(&ClosureSpacing::new()) {
            let messages: Vec<String> = failures.iter().map(ToString::to_string).collect();
            panic!("{}", messages.join("\n"));
        }
    }

    #[test]
    fn test_reports_single_violation_at_open_brace() {
        let violations = check_code("[].filter({$0.contains(location)})");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.offset, 10);
        assert_eq!(violations[0].location.column, 11);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].code, CODE);
    }

    #[test]
    fn test_nested_closures_need_two_passes() {
        let (first, corrections) = correct_code("filter {sorted { $0 < $1}}");
        insta::assert_snapshot!(first, @"filter { sorted { $0 < $1} }");
        // both detected locations are reported, only the outer one is fixed
        assert_eq!(corrections.len(), 2);
        assert_eq!(corrections[0].location.offset, 7);
        assert_eq!(corrections[1].location.offset, 15);

        let (second, corrections) = correct_code(&first);
        insta::assert_snapshot!(second, @"filter { sorted { $0 < $1 } }");
        assert_eq!(corrections.len(), 1);

        let (third, corrections) = correct_code(&second);
        assert_eq!(third, second);
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_correction_is_idempotent_without_nesting() {
        let code = "a.map {$0}\nb.filter {  $0 > 1}\nc.forEach { print($0) }";
        let (once, corrections) = correct_code(code);
        assert_eq!(corrections.len(), 2);
        insta::assert_snapshot!(once, @r"
        a.map { $0 }
        b.filter { $0 > 1 }
        c.forEach { print($0) }
        ");

        let (twice, corrections) = correct_code(&once);
        assert_eq!(twice, once);
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_corrections_report_original_locations() {
        let (_, corrections) = correct_code("x.map {$0}\ny.map {$0}");
        let lines: Vec<(usize, usize)> = corrections
            .iter()
            .map(|c| (c.location.line, c.location.column))
            .collect();
        assert_eq!(lines, vec![(1, 7), (2, 7)]);
    }

    #[test]
    fn test_no_violations_leaves_buffer_untouched() {
        let (mut file, syntax) = snapshot("items.map { $0 }");
        let corrections = ClosureSpacing::new().correct(&mut file, &syntax);
        assert!(corrections.is_empty());
        assert!(!file.is_modified());
    }

    #[test]
    fn test_ignores_comments_and_strings() {
        assert!(check_code("let s = \"{$0}\" // {$0}").is_empty());
        assert!(check_code("let s = \"\"\"\n{$0}\n\"\"\"").is_empty());
        assert!(check_code("let s = \"\\(items.map {$0})\"").is_empty());
        assert_eq!(check_code("let s = \"{\"; x.map {$0}").len(), 1);
    }

    #[test]
    fn test_braces_spanning_lines_are_ignored() {
        assert!(check_code("items.map {\n$0}\n").is_empty());
        assert!(check_code("} else {").is_empty());
    }

    #[test]
    fn test_multibyte_content() {
        let (fixed, corrections) = correct_code("names.map {\"é\" + $0}");
        assert_eq!(corrections.len(), 1);
        assert_eq!(fixed, "names.map { \"é\" + $0 }");
    }

    #[test]
    fn test_suppressed_pairs_are_not_corrected() {
        let code = "a.map {$0} // style-lint: allow(closure-spacing)\n\nb.map {$0}";
        let (fixed, corrections) = correct_code(code);
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].location.line, 3);
        assert_eq!(
            fixed,
            "a.map {$0} // style-lint: allow(closure-spacing)\n\nb.map { $0 }"
        );
    }

    #[test]
    fn test_severity_from_config() {
        let config = Config::parse("[rules.closure-spacing]\nseverity = \"error\"\n")
            .expect("config should parse");
        let rule = ClosureSpacing::from_config(&config);
        assert_eq!(rule.configuration_description(), "severity: error");

        let (file, syntax) = snapshot("x.map {$0}");
        let violations = rule.validate(&file, &syntax);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_capabilities() {
        let capabilities = ClosureSpacing::new().capabilities();
        assert!(capabilities.correctable);
        assert!(capabilities.configurable);
        assert_eq!(capabilities.to_string(), "validatable, correctable, configurable");
    }
}
