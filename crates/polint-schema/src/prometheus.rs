//! # Prometheus
//!
//! Schema for the `Prometheus` resource: a managed Prometheus deployment,
//! its rule and ServiceMonitor selection, alerting targets and remote
//! storage endpoints.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    Affinity, Container, LocalObjectReference, PodSecurityContext, ResourceRequirements,
    SecretKeySelector, Toleration,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};

use crate::common::{BasicAuth, RelabelConfig, StorageSpec, TlsConfig};

/// A Prometheus deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Prometheus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    /// Desired behaviour of the Prometheus cluster.
    pub spec: PrometheusSpec,
    /// Observed state. Read-only, written by the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PrometheusStatus>,
}

/// Desired behaviour of a Prometheus cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrometheusSpec {
    /// Labels and annotations propagated to the Prometheus pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_metadata: Option<ObjectMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_monitor_selector: Option<LabelSelector>,
    /// Namespaces searched for ServiceMonitors. Own namespace when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_monitor_namespace_selector: Option<LabelSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub image_pull_secrets: Vec<LocalObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    /// Time duration Prometheus retains data for, e.g. `24h`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_interval: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub external_labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_selector: Option<LabelSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_namespace_selector: Option<LabelSelector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerting: Option<AlertingSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub node_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
    /// Secrets mounted into `/etc/prometheus/secrets/<secret-name>`.
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub secrets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tolerations: Vec<Toleration>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remote_write: Vec<RemoteWriteSpec>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remote_read: Vec<RemoteReadSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<PodSecurityContext>,
    /// Listen on loopback instead of the pod IP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_local: Option<bool>,
    /// Extra containers injected into the pod, e.g. an auth proxy.
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub containers: Vec<Container>,
    /// Secret key holding scrape configs appended to the generated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_scrape_configs: Option<SecretKeySelector>,
    /// Secret key holding Alertmanager configs appended to the generated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_alert_manager_configs: Option<SecretKeySelector>,
}

/// Observed state of a Prometheus cluster. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrometheusStatus {
    pub paused: bool,
    pub replicas: i32,
    pub updated_replicas: i32,
    pub available_replicas: i32,
    pub unavailable_replicas: i32,
}

/// Alertmanagers Prometheus fires alerts against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AlertingSpec {
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub alertmanagers: Vec<AlertmanagerEndpoints>,
}

/// An Endpoints object holding Alertmanager IPs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct AlertmanagerEndpoints {
    pub namespace: String,
    pub name: String,
    /// Port name or number of the Alertmanager API.
    pub port: IntOrString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_file: Option<String>,
}

/// A `remote_write` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RemoteWriteSpec {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_timeout: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub write_relabel_configs: Vec<RelabelConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

/// A `remote_read` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RemoteReadSpec {
    pub url: String,
    /// Equality matchers that must be present in a selector to query this
    /// endpoint.
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub required_matchers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_recent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<TlsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_prometheus() {
        let p: Prometheus = serde_json::from_value(json!({
            "apiVersion": "monitoring.coreos.com/v1",
            "kind": "Prometheus",
            "metadata": { "name": "k8s" },
            "spec": {}
        }))
        .unwrap();
        assert_eq!(p.metadata.unwrap().name.as_deref(), Some("k8s"));
        assert!(p.spec.replicas.is_none());
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let p: Prometheus = serde_json::from_value(json!({
            "spec": {
                "imagePullSecrets": null,
                "externalLabels": null,
                "nodeSelector": null,
                "secrets": null,
                "tolerations": null,
                "remoteWrite": [ { "url": "http://remote/write", "writeRelabelConfigs": null } ],
                "remoteRead": null,
                "containers": null,
                "alerting": { "alertmanagers": null }
            }
        }))
        .unwrap();
        assert!(p.spec.node_selector.is_empty());
        assert!(p.spec.secrets.is_empty());
        assert!(p.spec.remote_write[0].write_relabel_configs.is_empty());
        assert!(p.spec.alerting.unwrap().alertmanagers.is_empty());
    }

    #[test]
    fn test_spec_is_required() {
        let err = serde_json::from_value::<Prometheus>(json!({
            "kind": "Prometheus",
            "metadata": { "name": "k8s" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("missing field `spec`"), "got: {err}");
    }

    #[test]
    fn test_unknown_spec_field_rejected() {
        let err = serde_json::from_value::<Prometheus>(json!({
            "spec": { "replica": 2 }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `replica`"), "got: {err}");
    }

    #[test]
    fn test_replicas_wrong_type_rejected() {
        let err = serde_json::from_value::<Prometheus>(json!({
            "spec": { "replicas": "two" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid type"), "got: {err}");
    }

    #[test]
    fn test_alertmanager_endpoint_port_accepts_name_or_number() {
        let spec: AlertingSpec = serde_json::from_value(json!({
            "alertmanagers": [
                { "namespace": "monitoring", "name": "alertmanager-main", "port": "web" },
                { "namespace": "monitoring", "name": "alertmanager-alt", "port": 9093 }
            ]
        }))
        .unwrap();
        assert_eq!(spec.alertmanagers[0].port, IntOrString::String("web".into()));
        assert_eq!(spec.alertmanagers[1].port, IntOrString::Int(9093));
    }

    #[test]
    fn test_alertmanager_endpoint_requires_port() {
        let err = serde_json::from_value::<AlertmanagerEndpoints>(json!({
            "namespace": "monitoring",
            "name": "alertmanager-main"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("missing field `port`"), "got: {err}");
    }

    #[test]
    fn test_remote_write_requires_url() {
        let err = serde_json::from_value::<RemoteWriteSpec>(json!({
            "remoteTimeout": "30s"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("missing field `url`"), "got: {err}");
    }

    #[test]
    fn test_status_requires_every_counter() {
        let err = serde_json::from_value::<PrometheusStatus>(json!({
            "paused": false,
            "replicas": 2
        }))
        .unwrap_err();
        assert!(err.to_string().contains("missing field"), "got: {err}");
    }
}
