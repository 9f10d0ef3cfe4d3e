//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# style-lint configuration

# Rule preset: "recommended" (all rules) or "minimal" (naming only)
preset = "recommended"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./Sources"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/Pods/**",
    "**/.build/**",
]

# File extensions to analyze
extensions = ["swift"]

# Respect .gitignore files
respect_gitignore = true

# Maximum number of files processed concurrently (default: all cores)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and tuned

[rules.identifier-name]
min_length = { warning = 3, error = 2 }
max_length = { warning = 40, error = 60 }
excluded = ["id"]
# allowed_symbols = ["_"]
validates_start_with_lowercase = true

[rules.closure-spacing]
enabled = true
# severity = "error"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("style-lint.toml");
    write_config(config_path, force)?;

    println!("Created style-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit style-lint.toml to configure rules");
    println!("  2. Run: style-lint check");
    println!("  3. Run: style-lint correct");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
