//! # Lint Driver
//!
//! Walks the file list in argument order and validates each manifest.
//!
//! By default the run stops at the first failing file: later files are
//! never read. `--keep-going` validates every file and reports every
//! failure, still in argument order.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use polint_core::LintError;
use polint_schema::SchemaValidator;

/// Arguments for linting a list of manifests.
#[derive(Args, Debug, Default)]
pub struct LintArgs {
    /// Manifests to lint, in order. Duplicates are linted again.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Validate every file and report every failure instead of stopping at
    /// the first.
    #[arg(long)]
    pub keep_going: bool,

    /// Also check PrometheusRule content: groups, rule names, expressions
    /// and label names.
    #[arg(long)]
    pub check_rules: bool,
}

impl LintArgs {
    /// The failure policy selected by the flags.
    pub fn policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        }
    }
}

/// What to do after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    FailFast,
    /// Record the failure and continue with the next file.
    KeepGoing,
}

/// A file that failed to lint.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: LintError,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Outcome of a lint run.
#[derive(Debug, Default)]
pub struct LintReport {
    /// Files that were read and validated, passing or not.
    pub checked: usize,
    /// Files that validated cleanly.
    pub passed: usize,
    /// Failures, in argument order.
    pub failures: Vec<FileFailure>,
}

impl LintReport {
    /// Returns true if no file failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure reported under the fail-fast policy.
    pub fn first_failure(&self) -> Option<&FileFailure> {
        self.failures.first()
    }
}

/// Lint `paths` in order under `policy`.
pub fn lint_files(
    validator: &SchemaValidator,
    paths: &[PathBuf],
    policy: FailurePolicy,
) -> LintReport {
    let mut report = LintReport::default();

    for path in paths {
        report.checked += 1;
        match validator.validate_file(path) {
            Ok(resource) => {
                tracing::debug!(
                    path = %path.display(),
                    kind = %resource.kind(),
                    name = resource.name().unwrap_or(""),
                    "valid"
                );
                report.passed += 1;
            }
            Err(error) => {
                tracing::debug!(
                    path = %path.display(),
                    category = error.category(),
                    "invalid"
                );
                report.failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
                if policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }
    }

    report
}

/// Execute a lint run.
///
/// Failures are printed to stderr, one line per file. Returns exit code:
/// 0 when every file is valid, 1 otherwise.
pub fn run_lint(args: &LintArgs) -> Result<u8> {
    let validator = SchemaValidator::new()
        .context("failed to build the resource kind registry")?
        .with_rule_checks(args.check_rules);

    tracing::info!(
        kinds = validator.registry().len(),
        files = args.files.len(),
        check_rules = args.check_rules,
        "linting manifests"
    );

    let report = lint_files(&validator, &args.files, args.policy());

    for failure in &report.failures {
        eprintln!("{failure}");
    }

    if args.keep_going && !report.is_success() {
        eprintln!(
            "{} of {} file(s) failed validation.",
            report.failures.len(),
            report.checked
        );
    }

    tracing::info!(
        checked = report.checked,
        passed = report.passed,
        failed = report.failures.len(),
        "lint finished"
    );

    Ok(if report.is_success() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const PROMETHEUS: &str = "apiVersion: monitoring.coreos.com/v1\nkind: Prometheus\nmetadata:\n  name: k8s\nspec:\n  replicas: 2\n";
    const BAD_PROMETHEUS: &str = "kind: Prometheus\nspec:\n  replicas: two\n";
    const UNKNOWN: &str = "kind: Probe\nspec: {}\n";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new().unwrap()
    }

    #[test]
    fn empty_file_list_succeeds() {
        let report = lint_files(&validator(), &[], FailurePolicy::FailFast);
        assert!(report.is_success());
        assert_eq!(report.checked, 0);
    }

    #[test]
    fn all_valid_files_pass_in_any_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.yaml", PROMETHEUS);
        let b = write(
            dir.path(),
            "b.yaml",
            "kind: ServiceMonitor\nspec:\n  endpoints: []\n  selector: {}\n",
        );

        for paths in [vec![a.clone(), b.clone()], vec![b.clone(), a.clone(), a.clone()]] {
            let report = lint_files(&validator(), &paths, FailurePolicy::FailFast);
            assert!(report.is_success(), "{:?}", report.failures);
            assert_eq!(report.passed, paths.len());
        }
    }

    #[test]
    fn fail_fast_stops_before_later_files() {
        let dir = tempfile::tempdir().unwrap();
        let valid = write(dir.path(), "a.yaml", PROMETHEUS);
        let invalid = write(dir.path(), "b.yaml", BAD_PROMETHEUS);
        // Never created: reading it would add a second failure.
        let never_read = dir.path().join("c.yaml");

        let report = lint_files(
            &validator(),
            &[valid, invalid.clone(), never_read],
            FailurePolicy::FailFast,
        );

        assert_eq!(report.checked, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failures.len(), 1);
        let failure = report.first_failure().unwrap();
        assert_eq!(failure.path, invalid);
        assert_eq!(failure.error.category(), "schema-decode");
    }

    #[test]
    fn keep_going_reports_every_failure_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.yaml", BAD_PROMETHEUS);
        let good = write(dir.path(), "good.yaml", PROMETHEUS);
        let unknown = write(dir.path(), "unknown.yaml", UNKNOWN);
        let missing = dir.path().join("missing.yaml");

        let report = lint_files(
            &validator(),
            &[bad.clone(), good, unknown.clone(), missing.clone()],
            FailurePolicy::KeepGoing,
        );

        assert_eq!(report.checked, 4);
        assert_eq!(report.passed, 1);
        let got: Vec<(&Path, &str)> = report
            .failures
            .iter()
            .map(|f| (f.path.as_path(), f.error.category()))
            .collect();
        assert_eq!(
            got,
            vec![
                (bad.as_path(), "schema-decode"),
                (unknown.as_path(), "unknown-kind"),
                (missing.as_path(), "read"),
            ]
        );
    }

    #[test]
    fn rerun_yields_same_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write(dir.path(), "a.yaml", PROMETHEUS),
            write(dir.path(), "b.yaml", UNKNOWN),
            write(dir.path(), "c.yaml", BAD_PROMETHEUS),
        ];
        let v = validator();
        let first = lint_files(&v, &paths, FailurePolicy::FailFast);
        let second = lint_files(&v, &paths, FailurePolicy::FailFast);
        assert_eq!(
            first.first_failure().map(|f| f.to_string()),
            second.first_failure().map(|f| f.to_string())
        );
        assert_eq!(first.first_failure().unwrap().path, paths[1]);
    }

    #[test]
    fn failure_display_is_prefixed_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.yaml", BAD_PROMETHEUS);
        let report = lint_files(&validator(), &[path.clone()], FailurePolicy::FailFast);
        let line = report.first_failure().unwrap().to_string();
        assert!(
            line.starts_with(&format!("{}: Prometheus is invalid: ", path.display())),
            "{line}"
        );
    }

    #[test]
    fn run_lint_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.yaml", PROMETHEUS);
        let bad = write(dir.path(), "bad.yaml", BAD_PROMETHEUS);

        let ok = LintArgs {
            files: vec![good.clone()],
            ..Default::default()
        };
        assert_eq!(run_lint(&ok).unwrap(), 0);

        let failing = LintArgs {
            files: vec![good, bad],
            keep_going: true,
            ..Default::default()
        };
        assert_eq!(run_lint(&failing).unwrap(), 1);

        assert_eq!(run_lint(&LintArgs::default()).unwrap(), 0);
    }

    #[test]
    fn check_rules_flag_reaches_validator() {
        let dir = tempfile::tempdir().unwrap();
        let rule = write(
            dir.path(),
            "rule.yaml",
            "kind: PrometheusRule\nspec:\n  groups: []\n",
        );
        let lenient = LintArgs {
            files: vec![rule.clone()],
            ..Default::default()
        };
        assert_eq!(run_lint(&lenient).unwrap(), 0);

        let strict = LintArgs {
            files: vec![rule],
            check_rules: true,
            ..Default::default()
        };
        assert_eq!(run_lint(&strict).unwrap(), 1);
    }

    #[test]
    fn policy_from_flags() {
        assert_eq!(LintArgs::default().policy(), FailurePolicy::FailFast);
        let args = LintArgs {
            keep_going: true,
            ..Default::default()
        };
        assert_eq!(args.policy(), FailurePolicy::KeepGoing);
    }
}
