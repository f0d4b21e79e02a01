// src/kubeconfig/kube.rs
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::types::ServiceAccountContext;
use crate::cluster::ClusterOperations;
use crate::config::KubeconfigMethod;
use crate::error::{Diagnose, Result, StepError, ToolError};
use crate::manifest::render_kubeconfig;
use crate::types::{Cluster, ServiceAccount};

/// Writes `contents` readable and writable by the owner only.
pub fn write_kubeconfig_file(path: &Path, contents: &str) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| ToolError::io(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| ToolError::io(path, e))?;

    restrict_permissions(path)
}

/// `mode` only applies on creation, so an existing file is tightened too.
fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| ToolError::io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

fn temp_path_for(output: &Path) -> PathBuf {
    let file_name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "kubeconfig".to_string());
    output.with_file_name(format!("{}.{}.tmp", file_name, Uuid::new_v4()))
}

/// Produces the service account kubeconfig for one cluster and checks that
/// it can reach the cluster.
pub struct KubeConfigGenerator<'a> {
    ops: &'a mut ClusterOperations,
    cluster: &'a Cluster,
}

impl<'a> KubeConfigGenerator<'a> {
    pub fn new(ops: &'a mut ClusterOperations, cluster: &'a Cluster) -> Self {
        Self { ops, cluster }
    }

    pub fn generate(
        &mut self,
        method: KubeconfigMethod,
        sa: &ServiceAccount,
        output: &Path,
    ) -> std::result::Result<PathBuf, StepError> {
        self.ops.log("Getting token for service account ...");
        let token = self.ops.get_token(self.cluster, sa).diagnose(
            "Unable to obtain token for service account. Check you have access to the service account created.",
        )?;

        match method {
            KubeconfigMethod::Template => self.generate_from_template(sa, &token, output)?,
            KubeconfigMethod::Minify => self.generate_minified(sa, &token, output)?,
        }

        self.ops.log("Checking connectivity to the cluster ...");
        let probe_namespace = sa
            .target_namespaces
            .first()
            .unwrap_or(&sa.namespace)
            .clone();
        self.ops
            .check_connectivity(output, &probe_namespace)
            .diagnose(format!(
                "Connection with generated kubeconfig {} failed",
                output.display()
            ))?;

        Ok(output.to_path_buf())
    }

    fn generate_from_template(
        &mut self,
        sa: &ServiceAccount,
        token: &str,
        output: &Path,
    ) -> std::result::Result<(), StepError> {
        self.ops.log("Getting cluster info ...");
        let info = self
            .ops
            .get_cluster_info(self.cluster)
            .diagnose("Failed to get cluster info")?;

        let sac = ServiceAccountContext {
            alias: sa.alias(),
            token: token.to_string(),
            server: info.server,
            ca_data: info.ca_data,
        };

        self.ops.log("Building kubeconfig ...");
        let kubeconfig = render_kubeconfig(&sac).diagnose("Failed to build kubeconfig")?;

        self.ops.log("Writing kubeconfig ...");
        write_kubeconfig_file(output, &kubeconfig).diagnose(format!(
            "Unable to create kubeconfig file at {}. Check that you have write access to that location.",
            output.display()
        ))
    }

    /// Rewrites a copy of the source kubeconfig with kubectl and minifies it
    /// down to the service account context.
    fn generate_minified(
        &mut self,
        sa: &ServiceAccount,
        token: &str,
        output: &Path,
    ) -> std::result::Result<(), StepError> {
        let alias = sa.alias();
        let user = format!("{}-token", alias);
        let temp = temp_path_for(output);

        self.ops.log("Cloning kubeconfig ...");
        self.ops
            .view_to_file(&self.cluster.kubeconfig_file, &["--raw"], &temp)
            .diagnose("Unable to clone kubeconfig")?;
        restrict_permissions(&temp).diagnose("Unable to protect temporary kubeconfig")?;

        self.ops.log("Renaming context in kubeconfig ...");
        self.ops
            .config(
                &temp,
                &["rename-context", &self.cluster.context.context_name, &alias],
            )
            .diagnose("Unable to rename kubeconfig context")?;

        self.ops.log("Switching context in kubeconfig ...");
        self.ops
            .config(&temp, &["use-context", &alias])
            .diagnose("Unable to switch kubeconfig context")?;

        self.ops.log("Creating token user in kubeconfig ...");
        self.ops
            .config(&temp, &["set-credentials", &user, "--token", token])
            .diagnose("Unable to create token user")?;

        self.ops.log("Updating context to use token user in kubeconfig ...");
        self.ops
            .config(&temp, &["set-context", &alias, "--user", &user])
            .diagnose("Unable to modify context")?;

        self.ops.log("Updating context with namespace in kubeconfig ...");
        self.ops
            .config(&temp, &["set-context", &alias, "--namespace", &sa.namespace])
            .diagnose("Unable to modify context")?;

        self.ops.log("Minifying kubeconfig ...");
        self.ops
            .view_to_file(&temp, &["--flatten", "--minify"], output)
            .diagnose("Unable to minify kubeconfig")?;
        restrict_permissions(output).diagnose(format!(
            "Unable to restrict permissions of {}",
            output.display()
        ))?;

        self.ops.debug_log("Deleting temp kubeconfig ...");
        fs::remove_file(&temp)
            .map_err(|e| ToolError::io(&temp, e))
            .diagnose("Unable to remove temporary kubeconfig")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::KubeConfig;
    use crate::kubectl::testing::FakeRunner;
    use crate::types::ClusterContext;
    use crate::utils::logging::testing::MockLogger;
    use base64::{engine::general_purpose, Engine as _};
    use tempfile::TempDir;

    fn cluster(dir: &Path) -> Cluster {
        Cluster::new(
            dir.join("source-kubeconfig"),
            ClusterContext {
                context_name: "prod".to_string(),
                cluster_name: "prod-cluster".to_string(),
            },
        )
    }

    fn account(targets: &[&str]) -> ServiceAccount {
        ServiceAccount {
            namespace: "spinnaker".to_string(),
            name: "spinnaker-sa".to_string(),
            target_namespaces: targets.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn token_runner() -> FakeRunner {
        let runner = FakeRunner::new();
        runner
            .respond(&["get", "serviceaccount"], "spinnaker-sa-token-x")
            .respond(
                &["get", "secret"],
                &general_purpose::STANDARD.encode("sa-bearer-token"),
            );
        runner
    }

    #[cfg(unix)]
    #[test]
    fn test_write_kubeconfig_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kubeconfig-sa");
        fs::write(&path, "stale").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_kubeconfig_file(&path, "apiVersion: v1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "apiVersion: v1\n");
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_write_kubeconfig_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("kubeconfig");

        let err = write_kubeconfig_file(&path, "x").unwrap_err();

        assert!(err.to_string().contains("missing-dir"));
    }

    #[test]
    fn test_minify_rewrites_source_kubeconfig() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("kubeconfig-sa");
        let minified = "apiVersion: v1\nkind: Config\ncurrent-context: spinnaker-spinnaker-sa\n";

        let runner = token_runner();
        runner
            .respond(&["view", "--raw"], "apiVersion: v1\nkind: Config\n")
            .respond(&["view", "--flatten", "--minify"], minified);
        let mut ops = ClusterOperations::new(Box::new(runner.clone()), Box::new(MockLogger::new()));
        let cluster = cluster(dir.path());

        let written = KubeConfigGenerator::new(&mut ops, &cluster)
            .generate(KubeconfigMethod::Minify, &account(&[]), &output)
            .unwrap();

        assert_eq!(written, output);
        assert_eq!(fs::read_to_string(&output).unwrap(), minified);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("kubeconfig-sa")]);

        assert_eq!(runner.calls_with(&["rename-context", "prod", "spinnaker-spinnaker-sa"]).len(), 1);
        assert_eq!(
            runner
                .calls_with(&["set-credentials", "spinnaker-spinnaker-sa-token", "--token", "sa-bearer-token"])
                .len(),
            1
        );
        assert_eq!(
            runner
                .calls_with(&["set-context", "spinnaker-spinnaker-sa", "--namespace", "spinnaker"])
                .len(),
            1
        );
        assert!(runner.calls_with(&["version"]).is_empty());
    }

    #[test]
    fn test_probe_uses_first_target_namespace() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("kubeconfig-sa");

        let runner = token_runner();
        runner
            .respond(&["version"], r#"{"clientVersion": {"major": "1", "minor": "29"}}"#)
            .respond(&["config", "view", "--raw"], "https://10.0.0.1:6443 LS0t");
        let mut ops = ClusterOperations::new(Box::new(runner.clone()), Box::new(MockLogger::new()));
        let cluster = cluster(dir.path());

        KubeConfigGenerator::new(&mut ops, &cluster)
            .generate(KubeconfigMethod::Template, &account(&["dev", "qa"]), &output)
            .unwrap();

        let probe = runner.calls_with(&["get", "pods"]);
        assert_eq!(probe.len(), 1);
        assert!(probe[0].has(&["-n", "dev"]));

        let parsed: KubeConfig =
            serde_yaml::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(parsed.users[0].user.token, "sa-bearer-token");
        assert_eq!(parsed.clusters[0].cluster.server, "https://10.0.0.1:6443");
    }
}
