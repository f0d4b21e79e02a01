// src/manifest/types.rs
use serde::Serialize;

pub const RBAC_API_VERSION: &str = "rbac.authorization.k8s.io/v1";
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// A Kubernetes object as applied with `kubectl apply -f -`. Only the fields
/// used by the generated manifests are modeled.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<PolicyRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ref: Option<RoleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<Subject>>,
}

impl Object {
    pub fn new(api_version: &'static str, kind: &'static str, metadata: Metadata) -> Self {
        Self {
            api_version,
            kind,
            metadata,
            rules: None,
            role_ref: None,
            subjects: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    pub api_groups: Vec<String>,
    pub resources: Vec<String>,
    pub verbs: Vec<String>,
}

impl PolicyRule {
    pub fn wildcard() -> Self {
        let all = || vec!["*".to_string()];
        Self {
            api_groups: all(),
            resources: all(),
            verbs: all(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    pub api_group: &'static str,
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct Subject {
    pub kind: &'static str,
    pub name: String,
    pub namespace: String,
}
