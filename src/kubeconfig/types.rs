// src/kubeconfig/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfig {
    pub api_version: String,
    pub clusters: Vec<NamedCluster>,
    pub contexts: Vec<NamedContext>,
    pub current_context: String,
    pub kind: String,
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
    pub users: Vec<NamedUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedCluster {
    pub cluster: ClusterConfig,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterConfig {
    pub certificate_authority_data: String,
    pub server: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedContext {
    pub context: ContextConfig,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextConfig {
    pub cluster: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedUser {
    pub name: String,
    pub user: UserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    pub token: String,
}

/// Values substituted into a service account kubeconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountContext {
    pub alias: String,
    pub token: String,
    pub server: String,
    pub ca_data: String,
}

impl KubeConfig {
    /// Single cluster/context/user kubeconfig, everything named by the alias.
    pub fn for_service_account(sac: &ServiceAccountContext) -> Self {
        Self {
            api_version: "v1".to_string(),
            clusters: vec![NamedCluster {
                cluster: ClusterConfig {
                    certificate_authority_data: sac.ca_data.clone(),
                    server: sac.server.clone(),
                },
                name: sac.alias.clone(),
            }],
            contexts: vec![NamedContext {
                context: ContextConfig {
                    cluster: sac.alias.clone(),
                    user: sac.alias.clone(),
                    namespace: None,
                },
                name: sac.alias.clone(),
            }],
            current_context: sac.alias.clone(),
            kind: "Config".to_string(),
            preferences: BTreeMap::new(),
            users: vec![NamedUser {
                name: sac.alias.clone(),
                user: UserConfig {
                    token: sac.token.clone(),
                },
            }],
        }
    }
}
