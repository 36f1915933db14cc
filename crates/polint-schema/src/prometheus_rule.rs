//! # PrometheusRule
//!
//! Schema for the `PrometheusRule` resource: groups of alerting and
//! recording rules mounted into Prometheus.
//!
//! Structural decoding only proves the document has the right shape.
//! [`PrometheusRule::check_rules`] goes further and applies the checks the
//! Prometheus rule-file loader performs: every group is named once and
//! holds rules, every rule is exactly one of alert or record, has an
//! expression, and uses valid metric and label names.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Alerting and recording rules for a Prometheus instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrometheusRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,
    pub spec: PrometheusRuleSpec,
}

/// Content of a Prometheus rule file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrometheusRuleSpec {
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub groups: Vec<RuleGroup>,
}

/// Sequentially evaluated rules sharing an evaluation interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RuleGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub rules: Vec<Rule>,
}

/// An alerting or recording rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    pub expr: String,
    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "crate::common::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub annotations: BTreeMap<String, String>,
}

/// A rule content defect found by [`PrometheusRule::check_rules`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// Group the defect was found in, if any.
    pub group: Option<String>,
    /// 1-based position of the rule within its group, if the defect is
    /// about a single rule.
    pub rule: Option<usize>,
    pub message: String,
}

impl RuleViolation {
    fn file(message: impl Into<String>) -> Self {
        Self {
            group: None,
            rule: None,
            message: message.into(),
        }
    }

    fn group(group: &str, message: impl Into<String>) -> Self {
        Self {
            group: Some(group.to_string()),
            rule: None,
            message: message.into(),
        }
    }

    fn rule(group: &str, rule: usize, message: impl Into<String>) -> Self {
        Self {
            group: Some(group.to_string()),
            rule: Some(rule),
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.group, self.rule) {
            (Some(g), Some(r)) => write!(f, "group {g:?}, rule {r}: {}", self.message),
            (Some(g), None) => write!(f, "group {g:?}: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

impl Rule {
    fn record_name(&self) -> Option<&str> {
        self.record.as_deref().filter(|s| !s.is_empty())
    }

    fn alert_name(&self) -> Option<&str> {
        self.alert.as_deref().filter(|s| !s.is_empty())
    }

    fn check(&self, group: &str, position: usize, out: &mut Vec<RuleViolation>) {
        let mut push = |msg: String| out.push(RuleViolation::rule(group, position, msg));

        match (self.record_name(), self.alert_name()) {
            (Some(_), Some(_)) => push("only one of 'record' and 'alert' must be set".into()),
            (None, None) => push("one of 'record' or 'alert' must be set".into()),
            (Some(record), None) => {
                if !is_valid_metric_name(record) {
                    push(format!("invalid recording rule name: {record}"));
                }
                if !self.annotations.is_empty() {
                    push("invalid field 'annotations' in recording rule".into());
                }
                if self.for_.as_deref().is_some_and(|f| !f.is_empty()) {
                    push("invalid field 'for' in recording rule".into());
                }
            }
            (None, Some(_)) => {
                for name in self.annotations.keys() {
                    if !is_valid_label_name(name) {
                        push(format!("invalid annotation name: {name}"));
                    }
                }
            }
        }

        if self.expr.trim().is_empty() {
            push("field 'expr' must be set in rule".into());
        }

        for name in self.labels.keys() {
            if !is_valid_label_name(name) || name == METRIC_NAME_LABEL {
                push(format!("invalid label name: {name}"));
            }
        }
    }
}

impl PrometheusRule {
    /// Check rule content beyond the structural schema.
    ///
    /// Returns every defect found, in document order. An empty result means
    /// the rules would load into Prometheus.
    pub fn check_rules(&self) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        if self.spec.groups.is_empty() {
            violations.push(RuleViolation::file("no group found"));
            return violations;
        }

        let mut seen = HashSet::new();
        for group in &self.spec.groups {
            if group.name.is_empty() {
                violations.push(RuleViolation::file("group name must not be empty"));
            } else if !seen.insert(group.name.as_str()) {
                violations.push(RuleViolation::group(
                    &group.name,
                    "repeated in the same file",
                ));
            }

            if group.rules.is_empty() {
                violations.push(RuleViolation::group(
                    &group.name,
                    format!("no rules found in group: {}", group.name),
                ));
                continue;
            }

            for (i, rule) in group.rules.iter().enumerate() {
                rule.check(&group.name, i + 1, &mut violations);
            }
        }

        violations
    }
}

/// Reserved label carrying the series name; rules may not set it.
const METRIC_NAME_LABEL: &str = "__name__";

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`
fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
