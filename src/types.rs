// types.rs
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterContext {
    pub context_name: String,
    pub cluster_name: String,
}

/// Everything needed to talk to a cluster through kubectl.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub kubeconfig_file: PathBuf,
    pub context: ClusterContext,
}

impl Cluster {
    pub fn new(kubeconfig_file: PathBuf, context: ClusterContext) -> Self {
        Self {
            kubeconfig_file,
            context,
        }
    }

    /// `--kubeconfig <file> --context <name>` followed by `command`.
    pub fn command(&self, command: &[&str]) -> Vec<String> {
        let mut args = vec![
            "--kubeconfig".to_string(),
            self.kubeconfig_file.display().to_string(),
            "--context".to_string(),
            self.context.context_name.clone(),
        ];
        args.extend(command.iter().map(|s| s.to_string()));
        args
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceAccount {
    pub namespace: String,
    pub name: String,
    /// Namespaces to grant access to; empty means cluster-admin.
    pub target_namespaces: Vec<String>,
    pub new_namespace: bool,
    pub new_service_account: bool,
}

impl ServiceAccount {
    /// Name used for the cluster, context and user of the generated kubeconfig.
    pub fn alias(&self) -> String {
        format!("{}-{}", self.namespace, self.name)
    }

    pub fn is_cluster_admin(&self) -> bool {
        self.target_namespaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_command_prefixes_kubeconfig_and_context() {
        let cluster = Cluster::new(
            PathBuf::from("/home/ops/.kube/config"),
            ClusterContext {
                context_name: "prod".to_string(),
                cluster_name: "prod-cluster".to_string(),
            },
        );

        assert_eq!(
            cluster.command(&["get", "namespace", "-o=json"]),
            vec![
                "--kubeconfig",
                "/home/ops/.kube/config",
                "--context",
                "prod",
                "get",
                "namespace",
                "-o=json"
            ]
        );
    }

    #[test]
    fn test_alias_joins_namespace_and_name() {
        let sa = ServiceAccount {
            namespace: "spinnaker".to_string(),
            name: "spinnaker-sa".to_string(),
            ..Default::default()
        };
        assert_eq!(sa.alias(), "spinnaker-spinnaker-sa");
        assert!(sa.is_cluster_admin());
    }
}
