//! Runs a rule against the examples in its own description.
//!
//! - non-triggering examples must produce no violations, and correctable
//!   rules must leave them untouched
//! - triggering examples must produce at least one violation, exactly at
//!   their markers when they have any
//! - correction examples must turn into the expected text after one pass

use crate::description::Example;
use crate::file::SourceFile;
use crate::rule::Rule;
use crate::syntax::SyntaxModel;

use thiserror::Error;

/// Which example list a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    /// Must not trigger.
    NonTriggering,
    /// Must trigger at markers.
    Triggering,
    /// Must correct to the expected output.
    Correction,
}

impl std::fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonTriggering => write!(f, "non-triggering"),
            Self::Triggering => write!(f, "triggering"),
            Self::Correction => write!(f, "correction"),
        }
    }
}

/// A rule example that did not behave as documented.
#[derive(Debug, Clone, Error)]
#[error("{rule}: {kind} example failed: {message}\n---\n{code}\n---")]
pub struct ExampleFailure {
    /// Rule identifier.
    pub rule: &'static str,
    /// Example list.
    pub kind: ExampleKind,
    /// Example code with markers removed.
    pub code: String,
    /// What went wrong.
    pub message: String,
}

/// Checks every example of `rule`.
///
/// # Errors
///
/// Returns every failing example.
pub fn verify_rule(rule: &dyn Rule) -> Result<(), Vec<ExampleFailure>> {
    let description = rule.description();
    let mut failures = Vec::new();
    let mut fail = |kind, example: &Example, message: String| {
        failures.push(ExampleFailure {
            rule: description.identifier,
            kind,
            code: example.code.clone(),
            message,
        });
    };

    for example in &description.non_triggering_examples {
        let (file, syntax) = snapshot(example);
        let violations = rule.validate(&file, &syntax);
        if !violations.is_empty() {
            let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
            fail(
                ExampleKind::NonTriggering,
                example,
                format!("unexpected violations: {reasons:?}"),
            );
        }

        if let Some(correctable) = rule.as_correctable() {
            let mut corrected = file.clone();
            let corrections = correctable.correct(&mut corrected, &syntax);
            if !corrections.is_empty() || corrected.contents() != file.contents() {
                fail(
                    ExampleKind::NonTriggering,
                    example,
                    format!(
                        "correction changed the text ({} corrections): {:?}",
                        corrections.len(),
                        corrected.contents()
                    ),
                );
            }
        }
    }

    for example in &description.triggering_examples {
        let (file, syntax) = snapshot(example);
        let mut offsets: Vec<usize> = rule
            .validate(&file, &syntax)
            .iter()
            .map(|v| v.location.offset)
            .collect();
        offsets.sort_unstable();

        if offsets.is_empty() {
            fail(
                ExampleKind::Triggering,
                example,
                "expected at least one violation, got none".to_string(),
            );
        } else if !example.markers.is_empty() && offsets != example.markers {
            fail(
                ExampleKind::Triggering,
                example,
                format!(
                    "expected violations at {:?}, got {offsets:?}",
                    example.markers
                ),
            );
        }
    }

    for (input, expected) in &description.corrections {
        let Some(correctable) = rule.as_correctable() else {
            fail(
                ExampleKind::Correction,
                input,
                "rule has correction examples but is not correctable".to_string(),
            );
            continue;
        };
        let (mut file, syntax) = snapshot(input);
        correctable.correct(&mut file, &syntax);
        if file.contents() != expected.code {
            fail(
                ExampleKind::Correction,
                input,
                format!(
                    "expected {:?}, got {:?}",
                    expected.code,
                    file.contents()
                ),
            );
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

fn snapshot(example: &Example) -> (SourceFile, SyntaxModel) {
    let file = SourceFile::new(example.code.clone());
    let syntax = SyntaxModel::lex(&file).with_nodes(example.nodes.clone());
    (file, syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::{Category, RuleDescription};
    use crate::types::{Severity, Violation};
    use std::sync::OnceLock;

    /// Flags every `TODO` word.
    struct NoTodo;

    impl Rule for NoTodo {
        fn description(&self) -> &'static RuleDescription {
            static DESCRIPTION: OnceLock<RuleDescription> = OnceLock::new();
            DESCRIPTION.get_or_init(|| {
                RuleDescription::new("no-todo", "TEST002", "No Todo", Category::Lint)
                    .non_triggering(vec![Example::new("let done = true")])
                    .triggering(vec![
                        Example::new("↓TODO and ↓TODO"),
                        // wrong on purpose: the marker is off by one
                        Example::new("x↓ TODO"),
                    ])
            })
        }

        fn validate(&self, file: &SourceFile, _syntax: &SyntaxModel) -> Vec<Violation> {
            file.contents()
                .match_indices("TODO")
                .map(|(offset, _)| {
                    Violation::new(
                        self.description(),
                        Severity::Warning,
                        file.location(offset),
                        "TODO left in code",
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_reports_misplaced_marker() {
        let failures = verify_rule(&NoTodo).expect_err("second example is wrong");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, ExampleKind::Triggering);
        assert_eq!(failures[0].code, "x TODO");
        assert!(failures[0].message.contains("expected violations at [1], got [2]"));
    }

    /// Documents a triggering example but never reports anything.
    struct Silent;

    impl Rule for Silent {
        fn description(&self) -> &'static RuleDescription {
            static DESCRIPTION: OnceLock<RuleDescription> = OnceLock::new();
            DESCRIPTION.get_or_init(|| {
                RuleDescription::new("silent", "TEST003", "Silent", Category::Lint)
                    .triggering(vec![Example::new("let Bad = 1"), Example::new("let ↓Worse = 2")])
            })
        }

        fn validate(&self, _file: &SourceFile, _syntax: &SyntaxModel) -> Vec<Violation> {
            Vec::new()
        }
    }

    #[test]
    fn test_triggering_example_without_marker_must_trigger() {
        let failures = verify_rule(&Silent).expect_err("rule never fires");
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.kind == ExampleKind::Triggering));
        assert_eq!(failures[0].code, "let Bad = 1");
        assert_eq!(failures[0].message, "expected at least one violation, got none");
        assert_eq!(failures[1].code, "let Worse = 2");
    }

    #[test]
    fn test_unmarked_triggering_example_accepts_any_offset() {
        struct AnyTodo;

        impl Rule for AnyTodo {
            fn description(&self) -> &'static RuleDescription {
                static DESCRIPTION: OnceLock<RuleDescription> = OnceLock::new();
                DESCRIPTION.get_or_init(|| {
                    RuleDescription::new("any-todo", "TEST004", "Any Todo", Category::Lint)
                        .triggering(vec![Example::new("x TODO")])
                })
            }

            fn validate(&self, file: &SourceFile, syntax: &SyntaxModel) -> Vec<Violation> {
                NoTodo.validate(file, syntax)
            }
        }

        assert!(verify_rule(&AnyTodo).is_ok());
    }
}
