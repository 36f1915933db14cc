//! # polint-cli — Manifest Linter
//!
//! Provides the `po-lint` command-line interface: strict validation of
//! Prometheus Operator manifests before they are applied to a cluster.
//!
//! ```bash
//! po-lint alertmanager.yaml prometheus.yaml rules/*.yaml
//! po-lint --keep-going --check-rules manifests/*.yaml
//! ```
//!
//! Exit status is 0 when every file is valid and 1 otherwise. Each failing
//! file is reported on stderr as `<path>: <reason>`.

pub mod lint;

pub use lint::{lint_files, run_lint, FailurePolicy, FileFailure, LintArgs, LintReport};
