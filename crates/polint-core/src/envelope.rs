//! # Envelope — Kind Discovery
//!
//! The minimal shape decoded from every input before dispatch. Only
//! `kind` matters; `apiVersion` is kept for diagnostics. Unknown fields are
//! ignored here, strictness belongs to the per-kind schemas.
//!
//! A manifest is parsed once, with [`first_document`]. Both the envelope and
//! the strictly decoded schema are read from that parsed value. Only the
//! first document of a multi-document stream is linted.

use serde::de::Error as _;
use serde::Deserialize;

use crate::error::LintError;

/// Parse the first YAML document in `content`.
///
/// An empty stream is an empty (`null`) document.
///
/// # Errors
///
/// Returns [`LintError::EnvelopeDecode`] if the first document is not YAML.
pub fn first_document(content: &[u8]) -> Result<serde_yaml::Value, LintError> {
    match serde_yaml::Deserializer::from_slice(content).next() {
        Some(document) => {
            serde_yaml::Value::deserialize(document).map_err(LintError::EnvelopeDecode)
        }
        None => Ok(serde_yaml::Value::Null),
    }
}

/// `apiVersion` and `kind`, as found at the top of a Kubernetes manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// API group and version, e.g. `monitoring.coreos.com/v1`.
    #[serde(default)]
    pub api_version: Option<String>,
    /// Resource kind discriminator.
    #[serde(default)]
    pub kind: Option<String>,
}

impl Envelope {
    /// Decode the envelope from an already parsed document.
    ///
    /// A `null` document has no kind.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::EnvelopeDecode`] if the document is neither a
    /// mapping nor `null`, or `apiVersion`/`kind` are not strings.
    pub fn from_document(document: &serde_yaml::Value) -> Result<Self, LintError> {
        match document {
            serde_yaml::Value::Null => Ok(Self::default()),
            serde_yaml::Value::Mapping(_) => {
                serde_yaml::from_value(document.clone()).map_err(LintError::EnvelopeDecode)
            }
            other => Err(LintError::EnvelopeDecode(serde_yaml::Error::custom(format!(
                "expected a mapping at the top level, found {}",
                node_name(other)
            )))),
        }
    }

    /// Decode the envelope from the first document of raw YAML bytes.
    pub fn from_yaml(content: &[u8]) -> Result<Self, LintError> {
        Self::from_document(&first_document(content)?)
    }

    /// The discriminator, with a missing `kind` treated as empty.
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("")
    }
}

fn node_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(tagged) => node_name(&tagged.value),
    }
}
