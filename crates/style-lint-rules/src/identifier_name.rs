//! Rule enforcing naming conventions on declared identifiers.
//!
//! # Rationale
//!
//! Names should only contain alphanumeric characters, start with a
//! lowercase character or contain only uppercase characters at the start,
//! and stay within reasonable length bounds.
//!
//! # Checked Declarations
//!
//! - Variables of every scope (global, local, instance, class, static,
//!   parameter)
//! - Functions, methods, operators, initializers and subscripts
//! - Enum cases (any associated-value suffix is ignored)
//!
//! Overrides and names starting with `$` are never checked. A single
//! leading underscore is ignored on `private` and `fileprivate`
//! declarations.
//!
//! # Configuration
//!
//! - `min_length`: `{ warning = 3, error = 2 }`
//! - `max_length`: `{ warning = 40, error = 60 }`
//! - `excluded`: names never reported (default: `["id"]`)
//! - `allowed_symbols`: extra characters accepted in names
//! - `validates_start_with_lowercase`: case check for non-functions
//!   (default: true)

use std::sync::OnceLock;
use style_lint_core::{
    Attribute, Category, Config, ConfigError, Configurable, DeclarationKind, Example,
    NameConfiguration, Node, Rule, RuleDescription, Severity, SourceFile, Suggestion, SyntaxModel,
    Violation,
};

/// Rule code for identifier-name.
pub const CODE: &str = "SL001";

/// Rule identifier for identifier-name.
pub const NAME: &str = "identifier-name";

/// Characters an operator overload name can start with.
const OPERATOR_CHARACTERS: &[char] = &[
    '/', '=', '-', '+', '!', '*', '|', '^', '~', '?', '.', '%', '<', '>', '&',
];

/// Prefix of compiler-synthesized names.
const IMPLICIT_PREFIX: char = '$';

/// What `check_node` found wrong with one declaration.
#[derive(Debug)]
struct Finding {
    offset: usize,
    severity: Severity,
    reason: String,
    rename: Option<String>,
}

impl Finding {
    fn new(offset: usize, severity: Severity, reason: String) -> Self {
        Self {
            offset,
            severity,
            reason,
            rename: None,
        }
    }
}

/// Checks identifier names against length, character and case conventions.
#[derive(Debug, Clone, Default)]
pub struct IdentifierName {
    configuration: NameConfiguration,
}

impl IdentifierName {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule with the given configuration.
    #[must_use]
    pub fn with_configuration(configuration: NameConfiguration) -> Self {
        Self { configuration }
    }

    /// Reads the rule's options from `config`, under its identifier or any
    /// deprecated alias.
    ///
    /// # Errors
    ///
    /// Returns an error if an option is malformed or the length thresholds
    /// are not ordered.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let description = description();
        let rule_config = config.rule_config(description.all_identifiers());
        let configuration = NameConfiguration::from_rule_config(NAME, rule_config)?;
        tracing::debug!("{} configuration: {}", NAME, configuration);
        Ok(Self::with_configuration(configuration))
    }

    /// Active configuration.
    #[must_use]
    pub fn configuration(&self) -> &NameConfiguration {
        &self.configuration
    }

    fn check_tree(&self, file: &SourceFile, nodes: &[Node], violations: &mut Vec<Violation>) {
        for node in nodes {
            if let Some(finding) = self.check_node(node) {
                let violation = Violation::new(
                    description(),
                    finding.severity,
                    file.location(finding.offset),
                    finding.reason,
                );
                violations.push(match finding.rename {
                    Some(name) => {
                        violation.with_suggestion(Suggestion::new(format!("Rename to '{name}'")))
                    }
                    None => violation,
                });
            }
            self.check_tree(file, &node.children, violations);
        }
    }

    /// Returns at most one finding for `node`, ignoring its children.
    fn check_node(&self, node: &Node) -> Option<Finding> {
        let (name, offset) = node.name_and_offset()?;
        if node.has_attribute(Attribute::Override) || name.starts_with(IMPLICIT_PREFIX) {
            return None;
        }

        let kind = node.kind;
        let type_name = type_name(kind)?;
        let name = checked_name(node, name);
        if name.is_empty() || self.configuration.is_excluded(name) {
            return None;
        }

        let is_function = kind.is_function();
        if !is_function {
            let valid_characters = name
                .chars()
                .all(|c| c.is_alphanumeric() || self.configuration.is_allowed_symbol(c));
            if !valid_characters {
                return Some(Finding::new(
                    offset,
                    Severity::Error,
                    format!("{type_name} name should only contain alphanumeric characters: '{name}'"),
                ));
            }

            if let Some(severity) = self.configuration.severity_for_length(name.chars().count()) {
                let min = self.configuration.min_length();
                let max = self.configuration.max_length();
                return Some(Finding::new(
                    offset,
                    severity,
                    format!(
                        "{type_name} name should be between {} and {} characters long: '{name}'",
                        min.warning.max(min.error),
                        max.warning.min(max.error),
                    ),
                ));
            }
        }

        let first = name.chars().next()?;
        if self.configuration.is_allowed_symbol(first) {
            return None;
        }
        let requires_lowercase = self.configuration.validates_start_with_lowercase() || is_function;
        if !requires_lowercase
            || kind == DeclarationKind::VarStatic
            || OPERATOR_CHARACTERS.contains(&first)
        {
            return None;
        }

        is_violating_case(name).then(|| Finding {
            rename: Some(lowercase_first(name, first)),
            ..Finding::new(
                offset,
                Severity::Error,
                format!("{type_name} name should start with a lowercase character: '{name}'"),
            )
        })
    }
}

impl Rule for IdentifierName {
    fn description(&self) -> &'static RuleDescription {
        description()
    }

    fn validate(&self, file: &SourceFile, syntax: &SyntaxModel) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_tree(file, &syntax.nodes, &mut violations);
        violations
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

impl Configurable for IdentifierName {
    fn configuration_description(&self) -> String {
        self.configuration.to_string()
    }
}

fn type_name(kind: DeclarationKind) -> Option<&'static str> {
    if kind.is_function() {
        Some("Function")
    } else if kind == DeclarationKind::EnumCase {
        Some("Enum element")
    } else if kind.is_variable() {
        Some("Variable")
    } else {
        None
    }
}

/// The part of the declared name that conventions apply to.
fn checked_name<'a>(node: &Node, name: &'a str) -> &'a str {
    let name = if node.kind == DeclarationKind::EnumCase {
        name.split('(').next().unwrap_or(name)
    } else {
        name
    };
    if node.is_private() {
        name.strip_prefix('_').unwrap_or(name)
    } else {
        name
    }
}

/// `Foo` and `X` violate; `XMLParser` and `foo` do not.
fn is_violating_case(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase() && chars.next().map_or(true, char::is_lowercase)
}

fn lowercase_first(name: &str, first: char) -> String {
    first
        .to_lowercase()
        .chain(name[first.len_utf8()..].chars())
        .collect()
}

fn description() -> &'static RuleDescription {
    use Attribute::{Override, Private};
    use DeclarationKind::{EnumCase, FunctionFree, FunctionOperator, VarGlobal, VarStatic};

    static DESCRIPTION: OnceLock<RuleDescription> = OnceLock::new();
    DESCRIPTION.get_or_init(|| {
        RuleDescription::new(NAME, CODE, "Identifier Name", Category::Style)
            .description(
                "Identifier names should only contain alphanumeric characters and start with \
                 a lowercase character or should only contain capital letters. In an \
                 exception to the above, variable names may start with a capital letter when \
                 they are declared static and immutable. Variable names should not be too \
                 long or too short.",
            )
            .deprecated_alias("variable-name")
            .non_triggering(vec![
                Example::new("let myLet = 0").declaring(VarGlobal, "myLet"),
                Example::new("var myVar = 0").declaring(VarGlobal, "myVar"),
                Example::new("private let _myLet = 0").declaring_with(
                    VarGlobal,
                    "_myLet",
                    &[Private],
                ),
                Example::new("class Abc { static let MyLet = 0 }").declaring(VarStatic, "MyLet"),
                Example::new("let URL: NSURL? = nil").declaring(VarGlobal, "URL"),
                Example::new("let XMLParser = makeParser()").declaring(VarGlobal, "XMLParser"),
                Example::new("let id = 1").declaring(VarGlobal, "id"),
                Example::new("let café = 1").declaring(VarGlobal, "café"),
                Example::new("func isOperator(name: String) -> Bool").declaring(
                    FunctionFree,
                    "isOperator(name:)",
                ),
                Example::new("func == (lhs: Foo, rhs: Foo) -> Bool")
                    .declaring(FunctionOperator, "==(_:_:)"),
                Example::new("enum Foo { case myEnum(Int) }").declaring(EnumCase, "myEnum(_:)"),
                Example::new("override var BadName: Int = 0").declaring_with(
                    VarGlobal,
                    "BadName",
                    &[Override],
                ),
                Example::new("let $projected = wrapper").declaring(VarGlobal, "$projected"),
            ])
            .triggering(vec![
                Example::new("let ↓MyLet = 0").declaring(VarGlobal, "MyLet"),
                Example::new("let ↓_myLet = 0").declaring(VarGlobal, "_myLet"),
                Example::new("private let ↓myLet_ = 0").declaring_with(
                    VarGlobal,
                    "myLet_",
                    &[Private],
                ),
                Example::new("let ↓myExtremelyVeryVeryVeryVeryVeryVeryLongLet = 0")
                    .declaring(VarGlobal, "myExtremelyVeryVeryVeryVeryVeryVeryLongLet"),
                Example::new("var ↓i = 0").declaring(VarGlobal, "i"),
                Example::new("func ↓IsOperator(name: String) -> Bool")
                    .declaring(FunctionFree, "IsOperator(name:)"),
                Example::new("enum Foo { case ↓MyEnum(Int) }").declaring(EnumCase, "MyEnum(_:)"),
            ])
    })
}
