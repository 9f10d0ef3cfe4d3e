//! Correct command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the correct command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = super::load_config(source)?;
    let analyzer = super::build_analyzer(path, config, rules_filter, exclude)?;

    tracing::info!("Correcting {:?} with {} rules", path, analyzer.rule_count());

    let report = analyzer.correct().context("Correction failed")?;
    super::output::print_corrections(&report, format)
}
