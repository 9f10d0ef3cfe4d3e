//! Rule capability traits.
//!
//! Every rule is validatable through [`Rule`]. Rules opt into further
//! capabilities by returning themselves from [`Rule::as_correctable`] or
//! [`Rule::as_configurable`]; the analyzer queries these instead of relying
//! on concrete types.

use crate::description::RuleDescription;
use crate::file::SourceFile;
use crate::syntax::SyntaxModel;
use crate::types::{Correction, Violation};

/// A lint rule that produces violations for one file.
///
/// Rules hold no mutable state, so one instance can validate many files
/// concurrently.
///
/// # Example
///
/// ```ignore
/// use style_lint_core::{Rule, RuleDescription, SourceFile, SyntaxModel, Violation};
///
/// pub struct NoTabs;
///
/// impl Rule for NoTabs {
///     fn description(&self) -> &'static RuleDescription { &NO_TABS }
///
///     fn validate(&self, file: &SourceFile, _syntax: &SyntaxModel) -> Vec<Violation> {
///         file.contents()
///             .match_indices('\t')
///             .map(|(offset, _)| Violation::new(self.description(), Severity::Warning,
///                 file.location(offset), "Tabs are not allowed"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the shared description of this rule type.
    fn description(&self) -> &'static RuleDescription;

    /// Checks a file snapshot and returns any violations found.
    fn validate(&self, file: &SourceFile, syntax: &SyntaxModel) -> Vec<Violation>;

    /// Returns the correction capability, if the rule has one.
    fn as_correctable(&self) -> Option<&dyn Correctable> {
        None
    }

    /// Returns the configuration capability, if the rule has one.
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }

    /// The capability set of this rule.
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            validatable: true,
            correctable: self.as_correctable().is_some(),
            configurable: self.as_configurable().is_some(),
        }
    }
}

/// A rule that can rewrite the text it reports.
pub trait Correctable: Rule {
    /// Rewrites every correctable violation in `file` in a single
    /// whole-buffer write and returns what was corrected.
    ///
    /// `syntax` must describe the current contents of `file`. After this
    /// returns, offsets in `syntax` are stale if anything was written.
    fn correct(&self, file: &mut SourceFile, syntax: &SyntaxModel) -> Vec<Correction>;
}

/// A rule with user-tunable settings.
pub trait Configurable {
    /// Human-readable rendering of the active configuration.
    fn configuration_description(&self) -> String;
}

/// Which capabilities a rule implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Produces violations.
    pub validatable: bool,
    /// Rewrites text.
    pub correctable: bool,
    /// Exposes tunables.
    pub configurable: bool,
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (self.validatable, "validatable"),
            (self.correctable, "correctable"),
            (self.configurable, "configurable"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        f.write_str(&names.join(", "))
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
