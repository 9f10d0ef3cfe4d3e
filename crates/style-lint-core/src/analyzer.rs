//! Core analyzer for orchestrating validation and correction.

use crate::config::Config;
use crate::description::RuleDescription;
use crate::file::SourceFile;
use crate::rule::{Rule, RuleBox};
use crate::syntax::{LexicalSyntaxProvider, SyntaxError, SyntaxProvider};
use crate::types::{Correction, CorrectionReport, LintResult, Violation};

use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax model could not be built for a file.
    #[error("Syntax error in {path}: {source}")]
    Syntax {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        source: SyntaxError,
    },

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    extensions: Vec<String>,
    config: Option<Config>,
    syntax_provider: Option<Box<dyn SyntaxProvider>>,
    fail_on_syntax_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a file extension to analyze (without the dot).
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the default [`LexicalSyntaxProvider`].
    #[must_use]
    pub fn syntax_provider<P: SyntaxProvider + 'static>(mut self, provider: P) -> Self {
        self.syntax_provider = Some(Box::new(provider));
        self
    }

    /// Sets whether to fail on syntax errors (default: false).
    #[must_use]
    pub fn fail_on_syntax_error(mut self, fail: bool) -> Self {
        self.fail_on_syntax_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude_patterns = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut extensions = self.extensions;
        if extensions.is_empty() {
            extensions.clone_from(&config.analyzer.extensions);
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            extensions,
            syntax_provider: self
                .syntax_provider
                .unwrap_or_else(|| Box::new(LexicalSyntaxProvider)),
            fail_on_syntax_error: self.fail_on_syntax_error,
            config,
        })
    }
}

/// The main analyzer that runs rules over a directory tree.
///
/// Files are processed concurrently; rules within one file run in order.
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<glob::Pattern>,
    extensions: Vec<String>,
    syntax_provider: Box<dyn SyntaxProvider>,
    fail_on_syntax_error: bool,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Validates all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or on syntax
    /// errors when `fail_on_syntax_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let outcomes: Vec<Result<Option<Vec<Violation>>, AnalyzerError>> =
            self.in_pool(|| {
                files
                    .par_iter()
                    .map(|path| {
                        let file = SourceFile::from_path(path)?;
                        self.skip_syntax_error(path, self.validate_file(&file))
                    })
                    .collect()
            })?;

        let mut result = LintResult::new();
        for outcome in outcomes {
            if let Some(violations) = outcome? {
                result.violations.extend(violations);
                result.files_checked += 1;
            }
        }

        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.offset.cmp(&b.location.offset))
        });

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Corrects all files in place and returns what was corrected.
    ///
    /// Each file is rewritten on disk at most once, after every correctable
    /// rule has run against it.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery, reading or writing fails, or on
    /// syntax errors when `fail_on_syntax_error` is set.
    pub fn correct(&self) -> Result<CorrectionReport, AnalyzerError> {
        info!("Starting correction at {:?}", self.root);

        let files = self.discover_files()?;
        let outcomes: Vec<Result<Option<CorrectionReport>, AnalyzerError>> = self.in_pool(|| {
            files
                .par_iter()
                .map(|path| self.correct_path(path))
                .collect()
        })?;

        let mut report = CorrectionReport::new();
        for outcome in outcomes {
            if let Some(file_report) = outcome? {
                report.extend(file_report);
            }
        }

        report.corrections.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.offset.cmp(&b.location.offset))
        });

        info!(
            "Correction complete: {} corrections in {} files",
            report.corrections.len(),
            report.files_corrected
        );

        Ok(report)
    }

    /// Validates one in-memory file with every enabled rule.
    ///
    /// Violations suppressed by allow directives are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the syntax model cannot be built.
    pub fn validate_file(&self, file: &SourceFile) -> Result<Vec<Violation>, SyntaxError> {
        let syntax = self.syntax_provider.syntax(file)?;
        let mut violations = Vec::new();

        for rule in self.enabled_rules() {
            let description = rule.description();
            violations.extend(
                rule.validate(file, &syntax)
                    .into_iter()
                    .filter(|v| !is_suppressed(file, description, v.location.offset)),
            );
        }

        violations.sort_by_key(|v| v.location.offset);
        Ok(violations)
    }

    /// Applies every enabled correctable rule to one in-memory file.
    ///
    /// Rules run one after another; each sees the buffer left by the
    /// previous one, with a freshly derived syntax model.
    ///
    /// # Errors
    ///
    /// Returns an error if a syntax model cannot be built.
    pub fn correct_file(&self, file: &mut SourceFile) -> Result<Vec<Correction>, SyntaxError> {
        let mut corrections = Vec::new();

        for rule in self.enabled_rules() {
            let Some(correctable) = rule.as_correctable() else {
                continue;
            };
            let syntax = self.syntax_provider.syntax(file)?;
            let applied = correctable.correct(file, &syntax);
            if !applied.is_empty() {
                debug!(
                    "{} corrected {} location(s) in {}",
                    rule.description().identifier,
                    applied.len(),
                    file.path().map_or_else(|| "<input>".into(), |p| p.display().to_string())
                );
            }
            corrections.extend(applied);
        }

        Ok(corrections)
    }

    fn correct_path(&self, path: &Path) -> Result<Option<CorrectionReport>, AnalyzerError> {
        let mut file = SourceFile::from_path(path)?;
        let original_revision = file.revision();
        let Some(corrections) = self.skip_syntax_error(path, self.correct_file(&mut file))? else {
            return Ok(None);
        };

        let changed = file.revision() != original_revision;
        if changed {
            write_atomically(path, file.contents())?;
            debug!("Rewrote {}", path.display());
        }

        Ok(Some(CorrectionReport {
            corrections,
            files_corrected: usize::from(changed),
            files_checked: 1,
        }))
    }

    fn skip_syntax_error<T>(
        &self,
        path: &Path,
        outcome: Result<T, SyntaxError>,
    ) -> Result<Option<T>, AnalyzerError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(source) if self.fail_on_syntax_error => Err(AnalyzerError::Syntax {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn enabled_rules(&self) -> impl Iterator<Item = &RuleBox> {
        self.rules.iter().filter(|rule| {
            let description = rule.description();
            let enabled = self.config.is_rule_enabled(description.all_identifiers());
            if !enabled {
                debug!("Skipping disabled rule: {}", description.identifier);
            }
            enabled
        })
    }

    fn in_pool<T, F>(&self, work: F) -> Result<T, AnalyzerError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.config.analyzer.parallelism {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Ok(pool.install(work))
            }
            None => Ok(work()),
        }
    }

    /// Discovers all source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !self.has_supported_extension(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_supported_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        self.exclude_patterns.iter().any(|pattern| {
            if pattern.matches_path(path) || pattern.matches_path(relative) {
                return true;
            }

            // Also check as substring for patterns like "**/build/**"
            let normalized = pattern.as_str().replace("**", "");
            !normalized.is_empty() && path.to_string_lossy().contains(&normalized)
        })
    }
}

fn is_suppressed(file: &SourceFile, rule: &RuleDescription, offset: usize) -> bool {
    let allowance = file.allowance(rule, offset);
    if allowance.is_allowed() {
        debug!(
            "Suppressed {} at byte {} (reason: {})",
            rule.identifier,
            offset,
            allowance.reason().unwrap_or("none")
        );
    }
    allowance.is_allowed()
}

/// Replaces `path` with `contents` through a temporary file in the same
/// directory, so readers never observe a partial write.
fn write_atomically(path: &Path, contents: &str) -> Result<(), AnalyzerError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.persist(path).map_err(|e| AnalyzerError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/build/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
        assert_eq!(analyzer.extensions, vec!["swift"]);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .exclude("**/Generated/**")
            .exclude("vendor/*.swift")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/project/App/Generated/Api.swift")));
        assert!(analyzer.should_exclude(Path::new("/project/vendor/lib.swift")));
        assert!(analyzer.should_exclude(Path::new("/project/build/out.swift")));
        assert!(!analyzer.should_exclude(Path::new("/project/App/main.swift")));
    }

    #[test]
    fn test_supported_extensions() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .extension("swift")
            .extension("swiftinterface")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.has_supported_extension(Path::new("a.swift")));
        assert!(analyzer.has_supported_extension(Path::new("a.swiftinterface")));
        assert!(!analyzer.has_supported_extension(Path::new("a.swift.structure.json")));
        assert!(!analyzer.has_supported_extension(Path::new("Makefile")));
    }
}
