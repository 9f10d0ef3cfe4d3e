//! Integration test: built-in rules end-to-end via Analyzer.
//!
//! Writes Swift sources (and structure dumps where declarations matter)
//! into a temporary directory and checks that validation and correction
//! behave as a user running the tool would see them.

use std::fs;
use std::path::Path;
use style_lint_core::{Analyzer, Config, Severity};
use style_lint_rules::rules_from_config;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("fixture dir should be created");
    }
    fs::write(path, contents).expect("fixture should be written");
}

fn analyzer(root: &Path, config_toml: &str) -> Analyzer {
    let config = Config::parse(config_toml).expect("config should parse");
    let rules = rules_from_config(&config).expect("rules should build");

    let mut builder = Analyzer::builder().root(root).config(config);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    builder.build().expect("analyzer should build")
}

const MODEL: &str = "\
struct Model {
    let Name: String
    let id: Int
    func load() { items.map {$0} }
}
";

// Offsets of `Model`, `Name`, `id` and `load` in MODEL.
const MODEL_STRUCTURE: &str = r#"[
  {
    "kind": "other",
    "name": "Model",
    "offset": 7,
    "children": [
      { "kind": "var_instance", "name": "Name", "offset": 23 },
      { "kind": "var_instance", "name": "id", "offset": 44 },
      { "kind": "function_method_instance", "name": "load()", "offset": 61 }
    ]
  }
]"#;

#[test]
fn check_reports_both_rules() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(dir.path(), "Sources/Model.swift", MODEL);
    write(dir.path(), "Sources/Model.swift.structure.json", MODEL_STRUCTURE);

    let result = analyzer(dir.path(), "")
        .analyze()
        .expect("analysis should succeed");

    let found: Vec<(&str, usize, Severity)> = result
        .violations
        .iter()
        .map(|v| (v.rule.as_str(), v.location.line, v.severity))
        .collect();
    assert_eq!(
        found,
        vec![
            ("identifier-name", 2, Severity::Error),
            ("closure-spacing", 4, Severity::Warning),
        ]
    );
    assert_eq!(
        result.violations[0].reason,
        "Variable name should start with a lowercase character: 'Name'"
    );
}

#[test]
fn check_honors_rule_configuration() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(dir.path(), "Sources/Model.swift", MODEL);
    write(dir.path(), "Sources/Model.swift.structure.json", MODEL_STRUCTURE);

    let config = "\
[rules.variable-name]
validates_start_with_lowercase = false

[rules.closure-spacing]
severity = \"error\"
";
    let result = analyzer(dir.path(), config)
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule, "closure-spacing");
    assert!(result.has_errors());
}

#[test]
fn correct_converges_over_two_runs() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(
        dir.path(),
        "main.swift",
        "let sorted = filter {sorted { $0 < $1}}\nlet ok = items.map { $0 }\n",
    );
    let analyzer = analyzer(dir.path(), "");

    let first = analyzer.correct().expect("correction should succeed");
    assert_eq!(first.corrections.len(), 2);
    assert_eq!(first.files_corrected, 1);
    let text = fs::read_to_string(dir.path().join("main.swift")).expect("file should exist");
    assert_eq!(
        text,
        "let sorted = filter { sorted { $0 < $1} }\nlet ok = items.map { $0 }\n"
    );

    let second = analyzer.correct().expect("correction should succeed");
    assert_eq!(second.corrections.len(), 1);

    let third = analyzer.correct().expect("correction should succeed");
    assert!(third.corrections.is_empty());
    assert_eq!(third.files_corrected, 0);

    let result = analyzer.analyze().expect("analysis should succeed");
    assert!(result.violations.is_empty());
}

#[test]
fn correct_leaves_structure_only_rules_alone() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(dir.path(), "Sources/Model.swift", MODEL);
    write(dir.path(), "Sources/Model.swift.structure.json", MODEL_STRUCTURE);

    let report = analyzer(dir.path(), "")
        .correct()
        .expect("correction should succeed");

    assert_eq!(report.corrections.len(), 1);
    assert_eq!(report.corrections[0].rule, "closure-spacing");
    let text =
        fs::read_to_string(dir.path().join("Sources/Model.swift")).expect("file should exist");
    assert!(text.contains("items.map { $0 }"));
    assert!(text.contains("let Name: String"));
}

#[test]
fn disabled_rule_is_not_run() {
    let dir = TempDir::new().expect("temp dir should be created");
    write(dir.path(), "main.swift", "items.map {$0}\n");

    let report = analyzer(dir.path(), "[rules.closure-spacing]\nenabled = false\n")
        .correct()
        .expect("correction should succeed");

    assert!(report.corrections.is_empty());
    let text = fs::read_to_string(dir.path().join("main.swift")).expect("file should exist");
    assert_eq!(text, "items.map {$0}\n");
}
