//! # Resource Kind — Dispatch Discriminator
//!
//! Defines the `ResourceKind` enum, the closed set of Prometheus Operator
//! resources the linter knows how to validate. Every `match` on
//! `ResourceKind` must be exhaustive, so adding a kind forces the registry
//! and every consumer to handle it at compile time.
//!
//! The string form is the Kubernetes `kind` field verbatim. Parsing is
//! case-sensitive: `prometheus` is not `Prometheus`.

use std::str::FromStr;

use crate::error::LintError;

/// Prometheus Operator resource kinds understood by the linter.
///
/// | Kind | API group |
/// |------|-----------|
/// | Alertmanager | monitoring.coreos.com/v1 |
/// | Prometheus | monitoring.coreos.com/v1 |
/// | PrometheusRule | monitoring.coreos.com/v1 |
/// | ServiceMonitor | monitoring.coreos.com/v1 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// An Alertmanager cluster.
    Alertmanager,
    /// A Prometheus deployment.
    Prometheus,
    /// Alerting and recording rules for a Prometheus instance.
    PrometheusRule,
    /// Scrape configuration for a set of services.
    ServiceMonitor,
}

/// Total number of resource kinds. Used by the registry completeness check.
pub const RESOURCE_KIND_COUNT: usize = 4;

impl ResourceKind {
    /// Returns all resource kinds in canonical order.
    pub fn all_kinds() -> &'static [ResourceKind] {
        &[
            Self::Alertmanager,
            Self::Prometheus,
            Self::PrometheusRule,
            Self::ServiceMonitor,
        ]
    }

    /// Returns the Kubernetes `kind` string for this resource.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alertmanager => "Alertmanager",
            Self::Prometheus => "Prometheus",
            Self::PrometheusRule => "PrometheusRule",
            Self::ServiceMonitor => "ServiceMonitor",
        }
    }

    /// Comma-separated list of every known kind, in canonical order.
    ///
    /// Used in the unknown-kind diagnostic.
    pub fn known_kinds_list() -> String {
        Self::all_kinds()
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alertmanager" => Ok(Self::Alertmanager),
            "Prometheus" => Ok(Self::Prometheus),
            "PrometheusRule" => Ok(Self::PrometheusRule),
            "ServiceMonitor" => Ok(Self::ServiceMonitor),
            other => Err(LintError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}
