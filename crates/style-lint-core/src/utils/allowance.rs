//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // style-lint: allow(identifier-name) reason="mirrors the wire format"
//! let URL = endpoint
//! ```
//!
//! A directive applies to its own line and to the line after it. The rule
//! name `all` matches every rule.

use crate::file::SourceFile;

use std::collections::HashSet;

const DIRECTIVE_PREFIX: &str = "style-lint:";

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Looks for a directive covering `line` (1-indexed) that names any of
/// `rule_names`.
#[must_use]
pub fn check_allow_with_reason(file: &SourceFile, line: usize, rule_names: &[&str]) -> AllowCheck {
    let lines = file.lines();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        let text = file.line_text(&lines[check_line - 1]);
        if let Some(directive) = parse_allow_directive(text) {
            let matches = directive.rules.contains("all")
                || rule_names.iter().any(|name| directive.rules.contains(*name));
            if matches {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from the first `//` comment on a line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let comment_start = line.find("//")?;
    let comment_content = line[comment_start..].trim_start_matches('/').trim();

    let directive = comment_content.strip_prefix(DIRECTIVE_PREFIX)?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// style-lint: allow(identifier-name)")
            .expect("directive should parse");
        assert!(directive.rules.contains("identifier-name"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("// style-lint: allow(closure-spacing) reason=\"generated\"")
                .expect("directive should parse");
        assert!(directive.rules.contains("closure-spacing"));
        assert_eq!(directive.reason.as_deref(), Some("generated"));
    }

    #[test]
    fn test_parse_trailing_directive() {
        let directive = parse_allow_directive("let URL = x // style-lint: allow(a, b)")
            .expect("directive should parse");
        assert!(directive.rules.contains("a"));
        assert!(directive.rules.contains("b"));
    }

    #[test]
    fn test_parse_rejects_other_comments() {
        assert!(parse_allow_directive("// just a comment").is_none());
        assert!(parse_allow_directive("let a = 1").is_none());
        assert!(parse_allow_directive("// style-lint: allow()").is_none());
    }

    #[test]
    fn test_check_allow_on_previous_and_same_line() {
        let file = SourceFile::new(
            "// style-lint: allow(identifier-name) reason=\"legacy\"\nlet Foo = 1\nlet Bar = 2",
        );
        let check = check_allow_with_reason(&file, 2, &["identifier-name"]);
        assert!(check.is_allowed());
        assert_eq!(check.reason(), Some("legacy"));
        assert!(check_allow_with_reason(&file, 1, &["identifier-name"]).is_allowed());
        assert!(!check_allow_with_reason(&file, 3, &["identifier-name"]).is_allowed());
        assert!(!check_allow_with_reason(&file, 2, &["closure-spacing"]).is_allowed());
    }

    #[test]
    fn test_all_matches_every_rule() {
        let file = SourceFile::new("x.map {$0} // style-lint: allow(all)");
        assert!(check_allow_with_reason(&file, 1, &["closure-spacing"]).is_allowed());
    }

    #[test]
    fn test_alias_names_match() {
        let file = SourceFile::new("// style-lint: allow(variable-name)\nlet Foo = 1");
        let check = check_allow_with_reason(&file, 2, &["identifier-name", "variable-name"]);
        assert!(check.is_allowed());
    }
}
