//! # style-lint-core
//!
//! Core framework for rule-driven linting and auto-correction of source
//! files.
//!
//! This crate provides the foundational traits and types for building
//! style rules. It includes:
//!
//! - [`Rule`], [`Correctable`] and [`Configurable`], the rule capability set
//! - [`SourceFile`] and [`SyntaxModel`], the view of a file a rule works on
//! - [`RuleDescription`] with self-checking [`Example`]s
//! - [`correction`], the multi-range rewrite engine
//! - [`Analyzer`] for orchestrating validation and correction over a tree
//!
//! ## Example
//!
//! ```ignore
//! use style_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Sources")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod description;
mod file;
mod rule;
mod syntax;
mod types;

/// Multi-range rewrite engine for correctable rules.
pub mod correction;
/// Tokenizer behind the default syntax provider.
pub mod lexer;
/// Utility modules for rule implementations.
pub mod utils;
/// Self-checks of rule examples.
pub mod verification;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, Config, ConfigError, NameConfiguration, RuleConfig, SeverityConfiguration,
    SeverityLevels,
};
pub use description::{Category, Example, RuleDescription, VIOLATION_MARKER};
pub use file::{Line, SourceFile};
pub use rule::{Capabilities, Configurable, Correctable, Rule, RuleBox};
pub use syntax::{
    Attribute, ByteRange, DeclarationKind, LexicalSyntaxProvider, Node, SyntaxError, SyntaxModel,
    SyntaxProvider, Token, TokenKind,
};
pub use types::{
    Correction, CorrectionReport, LintResult, Location, Severity, Suggestion, Violation,
    ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
