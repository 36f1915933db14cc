//! # Error Types — Lint Failure Taxonomy
//!
//! Every failure the linter can report for a single file is a variant of
//! [`LintError`]. None of them are recovered locally: the driver decides
//! whether to stop at the first one or keep collecting.
//!
//! [`RegistryError`] is separate because it is a startup failure of the
//! linter itself, not a property of any input document.

use thiserror::Error;

use crate::kind::ResourceKind;

/// A single file failed to lint.
#[derive(Error, Debug)]
pub enum LintError {
    /// The file could not be read.
    #[error("unable to read file: {0}")]
    Read(#[from] std::io::Error),

    /// The content is not YAML, or its top level is not a mapping.
    #[error("unable to decode resource envelope: {0}")]
    EnvelopeDecode(#[source] serde_yaml::Error),

    /// The YAML document has no JSON equivalent.
    #[error("unable to convert YAML to JSON: {0}")]
    Conversion(String),

    /// The `kind` field names no registered schema.
    #[error(
        "kind {kind:?} is unknown to linter. Not in {}",
        ResourceKind::known_kinds_list()
    )]
    UnknownKind {
        /// The discriminator as found in the document.
        kind: String,
    },

    /// The kind is registered but the document does not match its schema.
    #[error("{kind} is invalid: {source}")]
    SchemaDecode {
        /// The resource kind the document declared.
        kind: ResourceKind,
        /// The strict decoder's error.
        #[source]
        source: serde_json::Error,
    },

    /// PrometheusRule content failed the rule checks.
    #[error("prometheus rule validation failed: {}", violations.join("; "))]
    RuleValidation {
        /// One entry per rule defect, in document order.
        violations: Vec<String>,
    },
}

impl LintError {
    /// Short category name, stable across runs. Used in summaries and tests.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Read(_) => "read",
            Self::EnvelopeDecode(_) => "envelope-decode",
            Self::Conversion(_) => "conversion",
            Self::UnknownKind { .. } => "unknown-kind",
            Self::SchemaDecode { .. } => "schema-decode",
            Self::RuleValidation { .. } => "rule-validation",
        }
    }
}

/// The kind registry table is malformed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The same discriminator appears twice.
    #[error("kind {0:?} is registered more than once")]
    DuplicateKind(String),

    /// A table key does not name any resource kind.
    #[error("kind {0:?} is not a known resource kind")]
    UnrecognizedKind(String),

    /// A resource kind has no decoder.
    #[error("no decoder registered for kind {0}")]
    MissingKind(ResourceKind),
}
