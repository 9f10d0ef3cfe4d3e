//! Syntax model consumed by rules.
//!
//! The parser that produces declaration structure lives outside this crate.
//! Rules see its output through two views:
//!
//! - a forest of [`Node`] descriptors (declarations with kind, name, offset)
//! - a [`Token`] stream with byte ranges, indexed per line
//!
//! [`LexicalSyntaxProvider`] builds the token view with the bundled
//! [`lexer`](crate::lexer) and loads node forests from structure dumps.

use crate::file::SourceFile;
use crate::lexer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A byte range in a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ByteRange {
    /// Start offset in bytes.
    pub location: usize,
    /// Length in bytes.
    pub length: usize,
}

impl ByteRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.location + self.length
    }

    /// Whether the range covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether `other` lies entirely within this range.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.location >= self.location && other.end() <= self.end()
    }

    /// Whether the two ranges share at least one byte.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.location < other.end() && other.location < self.end()
    }
}

/// Kind of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// Top-level variable.
    VarGlobal,
    /// Local variable.
    VarLocal,
    /// Instance property.
    VarInstance,
    /// Class property.
    VarClass,
    /// Static property.
    VarStatic,
    /// Function parameter.
    VarParameter,
    /// Free function.
    FunctionFree,
    /// Instance method.
    FunctionMethodInstance,
    /// Class method.
    FunctionMethodClass,
    /// Static method.
    FunctionMethodStatic,
    /// Operator function.
    FunctionOperator,
    /// Initializer.
    FunctionConstructor,
    /// Subscript.
    FunctionSubscript,
    /// Enum case.
    EnumCase,
    /// Any other declaration (types, extensions, ...).
    #[serde(other)]
    Other,
}

impl DeclarationKind {
    /// Whether this is a variable-like kind.
    #[must_use]
    pub const fn is_variable(self) -> bool {
        matches!(
            self,
            Self::VarGlobal
                | Self::VarLocal
                | Self::VarInstance
                | Self::VarClass
                | Self::VarStatic
                | Self::VarParameter
        )
    }

    /// Whether this is a function-like kind.
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(
            self,
            Self::FunctionFree
                | Self::FunctionMethodInstance
                | Self::FunctionMethodClass
                | Self::FunctionMethodStatic
                | Self::FunctionOperator
                | Self::FunctionConstructor
                | Self::FunctionSubscript
        )
    }
}

/// Attribute attached to a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Overrides a superclass member.
    Override,
    /// `private` access level.
    Private,
    /// `fileprivate` access level.
    Fileprivate,
    /// Static member.
    Static,
    /// Final member.
    Final,
}

/// Declaration descriptor produced by the external parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Declaration kind.
    pub kind: DeclarationKind,
    /// Declared name.
    #[serde(default)]
    pub name: Option<String>,
    /// Byte offset of the name.
    #[serde(default)]
    pub offset: Option<usize>,
    /// Attributes on the declaration.
    #[serde(default)]
    pub attributes: BTreeSet<Attribute>,
    /// Nested declarations.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with a name and offset.
    #[must_use]
    pub fn declaration(kind: DeclarationKind, name: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            offset: Some(offset),
            attributes: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }

    /// Returns the name and offset together, or `None` if either is missing.
    #[must_use]
    pub fn name_and_offset(&self) -> Option<(&str, usize)> {
        match (&self.name, self.offset) {
            (Some(name), Some(offset)) => Some((name.as_str(), offset)),
            _ => None,
        }
    }

    /// Whether the node carries `attribute`.
    #[must_use]
    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Whether the declaration is `private` or `fileprivate`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.has_attribute(Attribute::Private) || self.has_attribute(Attribute::Fileprivate)
    }
}

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Reserved word.
    Keyword,
    /// Identifier.
    Identifier,
    /// Numeric literal.
    Number,
    /// String literal, including interpolations.
    String,
    /// Line or block comment.
    Comment,
    /// Documentation comment.
    DocComment,
}

impl TokenKind {
    /// Whether the token is a comment or string literal.
    #[must_use]
    pub const fn is_comment_or_string(self) -> bool {
        matches!(self, Self::String | Self::Comment | Self::DocComment)
    }
}

/// Lexical token with its byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Covered bytes.
    pub range: ByteRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, location: usize, length: usize) -> Self {
        Self {
            kind,
            range: ByteRange::new(location, length),
        }
    }
}

/// Errors raised while building a syntax model.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// IO error reading a structure dump.
    #[error("Failed to read structure {path}: {source}")]
    Io {
        /// Path of the structure dump.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Malformed structure dump.
    #[error("Invalid structure: {0}")]
    Structure(#[from] serde_json::Error),
}

/// Structure and tokens of one file snapshot.
#[derive(Debug, Clone, Default)]
pub struct SyntaxModel {
    /// Top-level declarations.
    pub nodes: Vec<Node>,
    /// Tokens in ascending offset order.
    pub tokens: Vec<Token>,
    tokens_by_line: Vec<Vec<usize>>,
}

impl SyntaxModel {
    /// Builds a model from tokens, indexing them by the lines of `file`.
    #[must_use]
    pub fn new(file: &SourceFile, nodes: Vec<Node>, tokens: Vec<Token>) -> Self {
        let mut tokens_by_line = vec![Vec::new(); file.lines().len()];
        for (idx, token) in tokens.iter().enumerate() {
            let first = file
                .lines()
                .partition_point(|l| l.range.end() < token.range.location);
            for (line_idx, line) in file.lines().iter().enumerate().skip(first) {
                if line.range.location >= token.range.end() {
                    break;
                }
                tokens_by_line[line_idx].push(idx);
            }
        }
        Self {
            nodes,
            tokens,
            tokens_by_line,
        }
    }

    /// Lexes `file` with the bundled lexer. The model carries no nodes.
    #[must_use]
    pub fn lex(file: &SourceFile) -> Self {
        Self::new(file, Vec::new(), lexer::tokenize(file.contents()))
    }

    /// Replaces the node forest.
    #[must_use]
    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Tokens overlapping the line at `line_index` (0-based position in the
    /// file's line table).
    pub fn tokens_on_line(&self, line_index: usize) -> impl Iterator<Item = &Token> {
        self.tokens_by_line
            .get(line_index)
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.tokens.get(idx))
    }

    /// Parses a node forest from a JSON structure dump.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a list of nodes.
    pub fn nodes_from_structure_json(json: &str) -> Result<Vec<Node>, SyntaxError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Source of syntax models for the analyzer.
pub trait SyntaxProvider: Send + Sync {
    /// Builds the syntax model for the current state of `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if structure information exists but is unusable.
    fn syntax(&self, file: &SourceFile) -> Result<SyntaxModel, SyntaxError>;
}

/// Default provider: tokens from the bundled lexer, declarations from a
/// `<file>.structure.json` dump next to the source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSyntaxProvider;

impl LexicalSyntaxProvider {
    /// Path of the structure dump for a source file.
    #[must_use]
    pub fn structure_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".structure.json");
        PathBuf::from(name)
    }
}

impl SyntaxProvider for LexicalSyntaxProvider {
    fn syntax(&self, file: &SourceFile) -> Result<SyntaxModel, SyntaxError> {
        let model = SyntaxModel::lex(file);
        let Some(path) = file.path() else {
            return Ok(model);
        };

        let structure = Self::structure_path(path);
        if !structure.exists() {
            return Ok(model);
        }
        if file.is_modified() {
            // Offsets in the dump describe the on-disk text only.
            debug!(
                "Ignoring {} for rewritten buffer (revision {})",
                structure.display(),
                file.revision()
            );
            return Ok(model);
        }

        let json = std::fs::read_to_string(&structure).map_err(|e| SyntaxError::Io {
            path: structure.clone(),
            source: e,
        })?;
        Ok(model.with_nodes(SyntaxModel::nodes_from_structure_json(&json)?))
    }
}
