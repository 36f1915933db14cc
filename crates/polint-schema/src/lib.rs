//! # polint-schema — Strict Resource Schemas
//!
//! Strict serde models of the Prometheus Operator `monitoring.coreos.com/v1`
//! resources, and the machinery that dispatches a manifest to the right one.
//!
//! ## Schemas
//!
//! - [`Alertmanager`], [`Prometheus`], [`PrometheusRule`], [`ServiceMonitor`].
//!
//! Every struct owned here rejects unknown fields. Fields the operator API
//! serialises unconditionally are required. Embedded Kubernetes types come
//! from `k8s-openapi`.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaValidator::validate_file`] reads a manifest, decodes its kind
//! envelope, resolves the kind in the [`KindRegistry`], converts the YAML to
//! JSON and strictly decodes it. With rule checks enabled, PrometheusRule
//! content is also checked the way the Prometheus rule loader would.
//!
//! ## Crate Policy
//!
//! - Depends only on `polint-core` internally.
//! - A decoding failure is a value, never a panic or a process exit.

pub mod alertmanager;
pub mod common;
pub mod prometheus;
pub mod prometheus_rule;
pub mod registry;
pub mod service_monitor;
pub mod transcode;
pub mod validate;

pub use alertmanager::Alertmanager;
pub use prometheus::Prometheus;
pub use prometheus_rule::{PrometheusRule, RuleViolation};
pub use registry::{DecodeFn, KindRegistry, Resource, STANDARD_DECODERS};
pub use service_monitor::ServiceMonitor;
pub use validate::SchemaValidator;
