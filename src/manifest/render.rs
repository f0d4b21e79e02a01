// src/manifest/render.rs
use serde::Serialize;

use super::types::{Metadata, Object, PolicyRule, RoleRef, Subject, RBAC_API_GROUP, RBAC_API_VERSION};
use super::ManifestError;
use crate::kubeconfig::{KubeConfig, ServiceAccountContext};
use crate::types::ServiceAccount;

const ADMIN_CLUSTER_ROLE: &str = "cluster-admin";

fn require(
    document: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ManifestError> {
    if value.trim().is_empty() {
        return Err(ManifestError::MissingField { document, field });
    }
    Ok(())
}

fn require_account(document: &'static str, sa: &ServiceAccount) -> Result<(), ManifestError> {
    require(document, "namespace", &sa.namespace)?;
    require(document, "service account name", &sa.name)
}

fn to_yaml<T: Serialize>(document: &'static str, value: &T) -> Result<String, ManifestError> {
    serde_yaml::to_string(value).map_err(|source| ManifestError::Serialize { document, source })
}

/// Joins objects into one multi-document stream, each prefixed with `---`.
fn render_documents(document: &'static str, objects: &[Object]) -> Result<String, ManifestError> {
    let mut out = String::new();
    for object in objects {
        out.push_str("---\n");
        out.push_str(&to_yaml(document, object)?);
    }
    Ok(out)
}

fn service_account_object(sa: &ServiceAccount) -> Object {
    Object::new(
        "v1",
        "ServiceAccount",
        Metadata {
            name: sa.name.clone(),
            namespace: Some(sa.namespace.clone()),
        },
    )
}

fn subject(sa: &ServiceAccount) -> Subject {
    Subject {
        kind: "ServiceAccount",
        name: sa.name.clone(),
        namespace: sa.namespace.clone(),
    }
}

pub fn service_account_manifest(sa: &ServiceAccount) -> Result<String, ManifestError> {
    const DOC: &str = "ServiceAccount manifest";
    require_account(DOC, sa)?;
    render_documents(DOC, &[service_account_object(sa)])
}

/// The account plus a ClusterRoleBinding to `cluster-admin`.
pub fn admin_binding_manifest(sa: &ServiceAccount) -> Result<String, ManifestError> {
    const DOC: &str = "ClusterRoleBinding manifest";
    require_account(DOC, sa)?;

    let mut binding = Object::new(
        RBAC_API_VERSION,
        "ClusterRoleBinding",
        Metadata {
            name: format!("{}-admin", sa.alias()),
            namespace: None,
        },
    );
    binding.role_ref = Some(RoleRef {
        api_group: RBAC_API_GROUP,
        kind: "ClusterRole",
        name: ADMIN_CLUSTER_ROLE.to_string(),
    });
    binding.subjects = Some(vec![subject(sa)]);

    render_documents(DOC, &[service_account_object(sa), binding])
}

/// The account plus full access to a single `target` namespace: the
/// namespace itself, a wildcard Role and a RoleBinding.
pub fn namespace_binding_manifest(
    sa: &ServiceAccount,
    target: &str,
) -> Result<String, ManifestError> {
    const DOC: &str = "RoleBinding manifest";
    require_account(DOC, sa)?;
    require(DOC, "target namespace", target)?;

    let role_name = format!("{}-local-admin", sa.alias());

    let namespace = Object::new(
        "v1",
        "Namespace",
        Metadata {
            name: target.to_string(),
            namespace: None,
        },
    );

    let mut role = Object::new(
        RBAC_API_VERSION,
        "Role",
        Metadata {
            name: role_name.clone(),
            namespace: Some(target.to_string()),
        },
    );
    role.rules = Some(vec![PolicyRule::wildcard()]);

    let mut binding = Object::new(
        RBAC_API_VERSION,
        "RoleBinding",
        Metadata {
            name: format!("{}-binding", sa.alias()),
            namespace: Some(target.to_string()),
        },
    );
    binding.role_ref = Some(RoleRef {
        api_group: RBAC_API_GROUP,
        kind: "Role",
        name: role_name,
    });
    binding.subjects = Some(vec![subject(sa)]);

    render_documents(DOC, &[service_account_object(sa), namespace, role, binding])
}

pub fn render_kubeconfig(sac: &ServiceAccountContext) -> Result<String, ManifestError> {
    const DOC: &str = "kubeconfig";
    require(DOC, "alias", &sac.alias)?;
    require(DOC, "token", &sac.token)?;
    require(DOC, "server", &sac.server)?;
    require(DOC, "certificate-authority-data", &sac.ca_data)?;

    to_yaml(DOC, &KubeConfig::for_service_account(sac))
}
