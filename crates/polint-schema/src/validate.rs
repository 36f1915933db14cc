//! # Schema Validation
//!
//! Validates one manifest at a time. Each file goes through the same
//! linear sequence and stops at the first failing step:
//!
//! 1. read the bytes and parse the first YAML document,
//! 2. decode the `kind` envelope from it,
//! 3. resolve the kind in the [`KindRegistry`],
//! 4. transcode the same document to JSON and strictly decode the schema,
//! 5. optionally check PrometheusRule content.
//!
//! Nothing here terminates the process. Every outcome is a
//! `Result<Resource, LintError>` the caller decides what to do with.

use std::path::Path;

use polint_core::{first_document, Envelope, LintError, RegistryError};

use crate::registry::{KindRegistry, Resource};
use crate::transcode::yaml_to_json;

/// Strict validator for Prometheus Operator manifests.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    registry: KindRegistry,
    check_rules: bool,
}

impl SchemaValidator {
    /// Create a validator over the standard kind registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the built-in decoder table is malformed.
    pub fn new() -> Result<Self, RegistryError> {
        Ok(Self::with_registry(KindRegistry::standard()?))
    }

    /// Create a validator over an explicit registry.
    pub fn with_registry(registry: KindRegistry) -> Self {
        Self {
            registry,
            check_rules: false,
        }
    }

    /// Enable or disable PrometheusRule content checks.
    pub fn with_rule_checks(mut self, enabled: bool) -> Self {
        self.check_rules = enabled;
        self
    }

    /// Returns the kind registry.
    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Returns true if PrometheusRule content checks are enabled.
    pub fn rule_checks_enabled(&self) -> bool {
        self.check_rules
    }

    /// Validate a manifest already loaded into memory.
    pub fn validate_bytes(&self, content: &[u8]) -> Result<Resource, LintError> {
        let document = first_document(content)?;
        let envelope = Envelope::from_document(&document)?;
        let (kind, decode) = self.registry.lookup(envelope.kind())?;

        tracing::trace!(
            %kind,
            api_version = envelope.api_version.as_deref().unwrap_or(""),
            "resolved resource kind"
        );

        let resource = decode(yaml_to_json(&document)?)
            .map_err(|source| LintError::SchemaDecode { kind, source })?;

        if self.check_rules {
            if let Resource::PrometheusRule(rule) = &resource {
                let violations = rule.check_rules();
                if !violations.is_empty() {
                    return Err(LintError::RuleValidation {
                        violations: violations.iter().map(|v| v.to_string()).collect(),
                    });
                }
            }
        }

        Ok(resource)
    }

    /// Read and validate a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Read`] if the file cannot be read, otherwise any
    /// error from [`validate_bytes`](Self::validate_bytes).
    pub fn validate_file(&self, path: &Path) -> Result<Resource, LintError> {
        let content = std::fs::read(path)?;
        self.validate_bytes(&content)
    }
}
