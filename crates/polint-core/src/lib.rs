//! # polint-core — Foundational Types for po-lint
//!
//! Defines the pieces every other crate agrees on before any schema is
//! involved:
//!
//! 1. **`ResourceKind`.** The closed set of Prometheus Operator kinds the
//!    linter validates. One definition, exhaustive `match` everywhere.
//!
//! 2. **`Envelope`.** The `apiVersion`/`kind` header decoded leniently from
//!    every input to pick a schema.
//!
//! 3. **`LintError`.** One variant per failure category. Errors are values
//!    returned per file; terminating the process is the binary's decision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `polint-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod envelope;
pub mod error;
pub mod kind;

pub use envelope::{first_document, Envelope};
pub use error::{LintError, RegistryError};
pub use kind::{ResourceKind, RESOURCE_KIND_COUNT};
