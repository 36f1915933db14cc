//! # Kind Registry
//!
//! Maps the `kind` discriminator to the decoder for its schema. The table
//! is data, not control flow: adding a resource kind means adding a
//! [`ResourceKind`] variant, a [`Resource`] variant and one row in
//! [`STANDARD_DECODERS`].
//!
//! The table is checked when the registry is built. Every key must parse
//! as a `ResourceKind`, no key may appear twice, and every `ResourceKind`
//! must have a row.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use polint_core::{LintError, RegistryError, ResourceKind};

use crate::alertmanager::Alertmanager;
use crate::prometheus::Prometheus;
use crate::prometheus_rule::PrometheusRule;
use crate::service_monitor::ServiceMonitor;

/// Strictly decode a JSON document into one schema.
pub type DecodeFn = fn(Value) -> Result<Resource, serde_json::Error>;

/// A successfully decoded resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Alertmanager(Box<Alertmanager>),
    Prometheus(Box<Prometheus>),
    PrometheusRule(Box<PrometheusRule>),
    ServiceMonitor(Box<ServiceMonitor>),
}

impl Resource {
    /// The kind of the decoded schema.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Alertmanager(_) => ResourceKind::Alertmanager,
            Self::Prometheus(_) => ResourceKind::Prometheus,
            Self::PrometheusRule(_) => ResourceKind::PrometheusRule,
            Self::ServiceMonitor(_) => ResourceKind::ServiceMonitor,
        }
    }

    /// `metadata.name`, if set.
    pub fn name(&self) -> Option<&str> {
        let metadata = match self {
            Self::Alertmanager(r) => r.metadata.as_ref(),
            Self::Prometheus(r) => r.metadata.as_ref(),
            Self::PrometheusRule(r) => r.metadata.as_ref(),
            Self::ServiceMonitor(r) => r.metadata.as_ref(),
        };
        metadata.and_then(|m| m.name.as_deref())
    }

    /// Re-encode the resource as YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn decode_alertmanager(doc: Value) -> Result<Resource, serde_json::Error> {
    serde_json::from_value(doc).map(|r| Resource::Alertmanager(Box::new(r)))
}

fn decode_prometheus(doc: Value) -> Result<Resource, serde_json::Error> {
    serde_json::from_value(doc).map(|r| Resource::Prometheus(Box::new(r)))
}

fn decode_prometheus_rule(doc: Value) -> Result<Resource, serde_json::Error> {
    serde_json::from_value(doc).map(|r| Resource::PrometheusRule(Box::new(r)))
}

fn decode_service_monitor(doc: Value) -> Result<Resource, serde_json::Error> {
    serde_json::from_value(doc).map(|r| Resource::ServiceMonitor(Box::new(r)))
}

/// Discriminator → decoder table for every supported kind.
pub const STANDARD_DECODERS: &[(&str, DecodeFn)] = &[
    ("Alertmanager", decode_alertmanager as DecodeFn),
    ("Prometheus", decode_prometheus as DecodeFn),
    ("PrometheusRule", decode_prometheus_rule as DecodeFn),
    ("ServiceMonitor", decode_service_monitor as DecodeFn),
];

/// Validated lookup table from discriminator to decoder.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    decoders: HashMap<&'static str, (ResourceKind, DecodeFn)>,
}

impl KindRegistry {
    /// Build a registry from a decoder table.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnrecognizedKind`] if a key is not a resource kind.
    /// - [`RegistryError::DuplicateKind`] if a key appears twice.
    /// - [`RegistryError::MissingKind`] if a resource kind has no row.
    pub fn new(table: &[(&'static str, DecodeFn)]) -> Result<Self, RegistryError> {
        let mut decoders = HashMap::with_capacity(table.len());

        for &(key, decode) in table {
            let kind: ResourceKind = key
                .parse()
                .map_err(|_| RegistryError::UnrecognizedKind(key.to_string()))?;
            if decoders.insert(key, (kind, decode)).is_some() {
                return Err(RegistryError::DuplicateKind(key.to_string()));
            }
        }

        for kind in ResourceKind::all_kinds() {
            if !decoders.contains_key(kind.as_str()) {
                return Err(RegistryError::MissingKind(*kind));
            }
        }

        Ok(Self { decoders })
    }

    /// The registry for [`STANDARD_DECODERS`].
    pub fn standard() -> Result<Self, RegistryError> {
        Self::new(STANDARD_DECODERS)
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns true if no kind is registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Registered kinds in canonical order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds: Vec<ResourceKind> = self.decoders.values().map(|(k, _)| *k).collect();
        kinds.sort();
        kinds
    }

    /// Resolve a discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::UnknownKind`] if `kind` is not registered.
    pub fn lookup(&self, kind: &str) -> Result<(ResourceKind, DecodeFn), LintError> {
        self.decoders
            .get(kind)
            .copied()
            .ok_or_else(|| LintError::UnknownKind {
                kind: kind.to_string(),
            })
    }

    /// Strictly decode `doc` with the decoder registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::UnknownKind`] for an unregistered kind and
    /// [`LintError::SchemaDecode`] if the document does not match.
    pub fn decode(&self, kind: &str, doc: Value) -> Result<Resource, LintError> {
        let (kind, decode) = self.lookup(kind)?;
        decode(doc).map_err(|source| LintError::SchemaDecode { kind, source })
    }
}
