//! Rule metadata and self-test examples.

use crate::syntax::{Attribute, DeclarationKind, Node};

use std::collections::BTreeSet;

/// Marks the expected start of a violation inside an [`Example`].
pub const VIOLATION_MARKER: char = '↓';

/// Broad grouping of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Formatting and naming conventions.
    Style,
    /// Likely mistakes.
    Lint,
    /// Preferred language idioms.
    Idiomatic,
    /// Size and complexity limits.
    Metrics,
    /// Avoidable runtime cost.
    Performance,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Style => "style",
            Self::Lint => "lint",
            Self::Idiomatic => "idiomatic",
            Self::Metrics => "metrics",
            Self::Performance => "performance",
        };
        f.write_str(name)
    }
}

/// Source snippet shipped with a rule for self-testing.
///
/// Every [`VIOLATION_MARKER`] is removed from the code and its byte offset
/// in the cleaned code is recorded in `markers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Code with markers removed.
    pub code: String,
    /// Byte offsets of expected violations, ascending.
    pub markers: Vec<usize>,
    /// Declarations to feed structure-based rules.
    pub nodes: Vec<Node>,
    cursor: usize,
}

impl Example {
    /// Parses a snippet, stripping markers.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut code = String::with_capacity(source.len());
        let mut markers = Vec::new();
        for c in source.chars() {
            if c == VIOLATION_MARKER {
                markers.push(code.len());
            } else {
                code.push(c);
            }
        }
        Self {
            code,
            markers,
            nodes: Vec::new(),
            cursor: 0,
        }
    }

    /// Declares a node named `name`, located at the next whole-word
    /// occurrence of the name (up to any `(`) after previously declared
    /// nodes.
    #[must_use]
    pub fn declaring(self, kind: DeclarationKind, name: &str) -> Self {
        self.declaring_with(kind, name, &[])
    }

    /// Like [`Example::declaring`], with attributes.
    #[must_use]
    pub fn declaring_with(
        mut self,
        kind: DeclarationKind,
        name: &str,
        attributes: &[Attribute],
    ) -> Self {
        let base = name.split('(').next().unwrap_or(name);
        let offset = find_word(&self.code, self.cursor, base);
        if let Some(offset) = offset {
            self.cursor = offset + base.len();
        }
        self.nodes.push(Node {
            kind,
            name: Some(name.to_string()),
            offset,
            attributes: attributes.iter().copied().collect(),
            children: Vec::new(),
        });
        self
    }
}

fn find_word(code: &str, from: usize, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let is_ident = |c: char| c == '_' || c == '$' || c.is_alphanumeric();
    let mut start = from;
    while let Some(found) = code.get(start..)?.find(word) {
        let at = start + found;
        let end = at + word.len();
        let before_ok = code[..at].chars().next_back().map_or(true, |c| !is_ident(c));
        let after_ok = code[end..].chars().next().map_or(true, |c| !is_ident(c));
        if before_ok && after_ok {
            return Some(at);
        }
        start = at + word.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Identity and documentation of a rule type.
///
/// Built once per rule type and shared by every instance.
#[derive(Debug, Clone)]
pub struct RuleDescription {
    /// Kebab-case identifier used in configuration (e.g., "closure-spacing").
    pub identifier: &'static str,
    /// Short code (e.g., "SL002").
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What the rule checks.
    pub description: &'static str,
    /// Rule category.
    pub category: Category,
    /// Snippets that must not trigger the rule.
    pub non_triggering_examples: Vec<Example>,
    /// Snippets that must trigger the rule at each marker.
    pub triggering_examples: Vec<Example>,
    /// Input and expected output of one correction pass.
    pub corrections: Vec<(Example, Example)>,
    /// Former identifiers still accepted in configuration.
    pub deprecated_aliases: BTreeSet<&'static str>,
}

impl RuleDescription {
    /// Creates a description without examples.
    #[must_use]
    pub fn new(
        identifier: &'static str,
        code: &'static str,
        name: &'static str,
        category: Category,
    ) -> Self {
        Self {
            identifier,
            code,
            name,
            description: "",
            category,
            non_triggering_examples: Vec::new(),
            triggering_examples: Vec::new(),
            corrections: Vec::new(),
            deprecated_aliases: BTreeSet::new(),
        }
    }

    /// Sets the description text.
    #[must_use]
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the non-triggering examples.
    #[must_use]
    pub fn non_triggering(mut self, examples: Vec<Example>) -> Self {
        self.non_triggering_examples = examples;
        self
    }

    /// Sets the triggering examples.
    #[must_use]
    pub fn triggering(mut self, examples: Vec<Example>) -> Self {
        self.triggering_examples = examples;
        self
    }

    /// Sets the correction examples.
    #[must_use]
    pub fn corrections(mut self, corrections: Vec<(Example, Example)>) -> Self {
        self.corrections = corrections;
        self
    }

    /// Adds a deprecated alias.
    #[must_use]
    pub fn deprecated_alias(mut self, alias: &'static str) -> Self {
        self.deprecated_aliases.insert(alias);
        self
    }

    /// The identifier followed by every deprecated alias.
    pub fn all_identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.identifier).chain(self.deprecated_aliases.iter().copied())
    }

    /// Whether `name` refers to this rule by identifier, alias or code.
    #[must_use]
    pub fn matches_identifier(&self, name: &str) -> bool {
        name == self.code || self.all_identifiers().any(|id| id == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_are_stripped() {
        let example = Example::new("[].filter(↓{$0.contains(location)})");
        assert_eq!(example.code, "[].filter({$0.contains(location)})");
        assert_eq!(example.markers, vec![10]);
    }

    #[test]
    fn test_multiple_markers() {
        let example = Example::new("↓{a} ↓{b}");
        assert_eq!(example.code, "{a} {b}");
        assert_eq!(example.markers, vec![0, 4]);
    }

    #[test]
    fn test_declaring_finds_whole_words_in_order() {
        let example = Example::new("let bar = 1\nlet ↓a = bar")
            .declaring(DeclarationKind::VarGlobal, "bar")
            .declaring(DeclarationKind::VarGlobal, "a");
        assert_eq!(example.nodes[0].offset, Some(4));
        assert_eq!(example.nodes[1].offset, Some(16));
        assert_eq!(example.markers, vec![16]);
    }

    #[test]
    fn test_declaring_uses_base_of_function_name() {
        let example = Example::new("func ↓Foo(bar: Int) {}")
            .declaring(DeclarationKind::FunctionFree, "Foo(bar:)");
        assert_eq!(example.nodes[0].offset, Some(5));
        assert_eq!(example.nodes[0].name.as_deref(), Some("Foo(bar:)"));
    }

    #[test]
    fn test_aliases_match() {
        let description =
            RuleDescription::new("identifier-name", "SL001", "Identifier Name", Category::Style)
                .deprecated_alias("variable-name");
        assert!(description.matches_identifier("identifier-name"));
        assert!(description.matches_identifier("variable-name"));
        assert!(description.matches_identifier("SL001"));
        assert!(!description.matches_identifier("closure-spacing"));
    }
}
