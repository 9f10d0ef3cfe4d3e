//! In-memory source buffer shared by every rule.

use crate::description::RuleDescription;
use crate::syntax::ByteRange;
use crate::types::Location;
use crate::utils::allowance::{check_allow_with_reason, AllowCheck};

use std::path::{Path, PathBuf};

/// A single line of a [`SourceFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Line number (1-indexed).
    pub index: usize,
    /// Byte range of the line, excluding its terminator.
    pub range: ByteRange,
}

/// Text buffer of one analyzed file.
///
/// Offsets handed to rules are byte offsets into [`SourceFile::contents`].
/// Reporting converts them into character offsets through
/// [`SourceFile::location`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: Option<PathBuf>,
    contents: String,
    lines: Vec<Line>,
    revision: u32,
}

impl SourceFile {
    /// Creates a buffer that is not backed by a file on disk.
    #[must_use]
    pub fn new(contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let lines = compute_lines(&contents);
        Self {
            path: None,
            contents,
            lines,
            revision: 0,
        }
    }

    /// Attaches the path used in reported locations.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Reads a file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8 text.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(contents).with_path(path))
    }

    /// Path of the file, if the buffer is backed by one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current contents of the buffer.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Line table for the current contents.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Text of a line without its terminator.
    #[must_use]
    pub fn line_text(&self, line: &Line) -> &str {
        self.substring(line.range).unwrap_or_default()
    }

    /// Returns the text covered by `range`, or `None` if it is out of bounds
    /// or splits a character.
    #[must_use]
    pub fn substring(&self, range: ByteRange) -> Option<&str> {
        self.contents.get(range.location..range.end())
    }

    /// Finds the line containing `offset`. An offset pointing at a line
    /// terminator belongs to the line it terminates.
    #[must_use]
    pub fn line_for_offset(&self, offset: usize) -> Option<&Line> {
        let idx = self.lines.partition_point(|l| l.range.end() < offset);
        self.lines.get(idx)
    }

    /// Converts a byte offset into a character offset.
    #[must_use]
    pub fn character_offset(&self, byte_offset: usize) -> usize {
        self.contents
            .char_indices()
            .take_while(|(i, _)| *i < byte_offset)
            .count()
    }

    /// Builds a full [`Location`] for a byte offset.
    #[must_use]
    pub fn location(&self, byte_offset: usize) -> Location {
        let (line, column) = match self.line_for_offset(byte_offset) {
            Some(line) => {
                let start = line.range.location;
                let column = self
                    .contents
                    .get(start..byte_offset.max(start))
                    .map_or(0, |s| s.chars().count());
                (line.index, column + 1)
            }
            None => (self.lines.len().max(1), 1),
        };
        Location::new(self.path.clone(), line, column)
            .with_offsets(byte_offset, self.character_offset(byte_offset))
    }

    /// Replaces the whole buffer in one step.
    pub fn write(&mut self, contents: String) {
        self.lines = compute_lines(&contents);
        self.contents = contents;
        self.revision += 1;
    }

    /// Number of rewrites applied since the buffer was loaded.
    #[must_use]
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Whether any rewrite has been applied.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.revision > 0
    }

    /// Looks up an allow directive for `rule` covering `byte_offset`.
    #[must_use]
    pub fn allowance(&self, rule: &RuleDescription, byte_offset: usize) -> AllowCheck {
        let Some(line) = self.line_for_offset(byte_offset) else {
            return AllowCheck::Denied;
        };
        let names: Vec<&str> = rule.all_identifiers().collect();
        check_allow_with_reason(self, line.index, &names)
    }

    /// Whether `rule` is suppressed at `byte_offset`.
    #[must_use]
    pub fn is_rule_allowed(&self, rule: &RuleDescription, byte_offset: usize) -> bool {
        self.allowance(rule, byte_offset).is_allowed()
    }
}

fn compute_lines(contents: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (index, text) in contents.split('\n').enumerate() {
        let length = text.strip_suffix('\r').unwrap_or(text).len();
        lines.push(Line {
            index: index + 1,
            range: ByteRange::new(start, length),
        });
        start += text.len() + 1;
    }
    lines
}
