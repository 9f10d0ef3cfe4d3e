//! # style-lint-rules
//!
//! Built-in rules for style-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Capabilities | Description |
//! |------|------|--------------|-------------|
//! | SL001 | `identifier-name` | validatable, configurable | Naming conventions for variables, functions and enum cases |
//! | SL002 | `closure-spacing` | validatable, correctable, configurable | Single space inside closure braces |
//!
//! ## Usage
//!
//! ```ignore
//! use style_lint_core::{Analyzer, Config};
//! use style_lint_rules::rules_from_config;
//!
//! let config = Config::from_file("style-lint.toml".as_ref())?;
//! let mut builder = Analyzer::builder().root("./Sources");
//! for rule in rules_from_config(&config)? {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.config(config).build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Single space inside closure braces.
pub mod closure_spacing;
/// Identifier naming conventions.
pub mod identifier_name;
mod presets;

pub use closure_spacing::ClosureSpacing;
pub use identifier_name::IdentifierName;
pub use presets::{all_rules, configured_rules, rule_by_name, rules_from_config, Preset};

/// Re-export core types for convenience.
pub use style_lint_core::{Rule, Severity, Violation};
