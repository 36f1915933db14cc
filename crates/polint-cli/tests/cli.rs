//! Integration test: run the `po-lint` binary over the fixture manifests and
//! check exit status and stderr.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(rel)
}

fn po_lint(args: &[&str], files: &[PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_po-lint"))
        .args(args)
        .args(files)
        .output()
        .expect("failed to spawn po-lint")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn valid_fixtures_exit_zero() {
    let files = [
        fixture("valid/alertmanager.yaml"),
        fixture("valid/prometheus.yaml"),
        fixture("valid/prometheus-rule.yaml"),
        fixture("valid/service-monitor.yaml"),
    ];
    let output = po_lint(&[], &files);
    assert!(output.status.success(), "stderr:\n{}", stderr(&output));
    assert!(output.stdout.is_empty());
}

#[test]
fn no_files_exit_zero() {
    let output = po_lint(&[], &[]);
    assert!(output.status.success(), "stderr:\n{}", stderr(&output));
}

#[test]
fn first_failure_is_reported_with_path() {
    let bad = fixture("invalid/prometheus-unknown-field.yaml");
    let files = [
        fixture("valid/prometheus.yaml"),
        bad.clone(),
        fixture("invalid/unknown-kind.yaml"),
    ];
    let output = po_lint(&[], &files);
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines.len(), 1, "stderr:\n{err}");
    assert!(
        lines[0].starts_with(&format!("{}: Prometheus is invalid: ", bad.display())),
        "{err}"
    );
    assert!(!err.contains("PodMonitor"), "later file was linted:\n{err}");
}

#[test]
fn keep_going_reports_every_failure() {
    let files = [
        fixture("invalid/not-yaml.yaml"),
        fixture("valid/service-monitor.yaml"),
        fixture("invalid/unknown-kind.yaml"),
        fixture("invalid/service-monitor-missing-selector.yaml"),
    ];
    let output = po_lint(&["--keep-going"], &files);
    assert_eq!(output.status.code(), Some(1));

    let err = stderr(&output);
    assert!(err.contains("unable to decode resource envelope"), "{err}");
    assert!(err.contains("kind \"PodMonitor\" is unknown to linter"), "{err}");
    assert!(err.contains("ServiceMonitor is invalid: "), "{err}");
    assert!(err.contains("3 of 4 file(s) failed validation."), "{err}");

    let not_yaml = err.find("not-yaml.yaml").unwrap();
    let unknown = err.find("unknown-kind.yaml").unwrap();
    assert!(not_yaml < unknown, "failures out of order:\n{err}");
}

#[test]
fn missing_file_is_a_read_error() {
    let output = po_lint(&[], &[fixture("valid/does-not-exist.yaml")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unable to read file"));
}

#[test]
fn check_rules_rejects_empty_group() {
    let files = [fixture("invalid/prometheus-rule-empty-group.yaml")];

    let lenient = po_lint(&[], &files);
    assert!(lenient.status.success(), "stderr:\n{}", stderr(&lenient));

    let strict = po_lint(&["--check-rules"], &files);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("no rules found in group: placeholder.rules"));
}

#[test]
fn version_flag() {
    let output = po_lint(&["--version"], &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("po-lint "), "{stdout}");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "{stdout}");
}

#[test]
fn first_document_with_empty_lists_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stream.yaml");
    std::fs::write(
        &path,
        "kind: ServiceMonitor\nspec:\n  targetLabels:\n  endpoints:\n    - port: web\n  selector: {}\n---\nkind: Probe\n",
    )
    .unwrap();

    let output = po_lint(&[], &[path]);
    assert!(output.status.success(), "stderr:\n{}", stderr(&output));
}
