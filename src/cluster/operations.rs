// src/cluster/operations.rs
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;

use crate::discovery::{parse_contexts, ResourceChoices, ResourceList};
use crate::error::{Result, ToolError};
use crate::kubectl::{
    cluster_info_jsonpath, parse_cluster_info, redacted_args, ClusterInfo, CommandRunner,
    KubectlVersion,
};
use crate::types::{Cluster, ClusterContext, ServiceAccount};
use crate::utils::logging::Logger;

fn to_args(command: &[&str]) -> Vec<String> {
    command.iter().map(|s| s.to_string()).collect()
}

/// Every kubectl round trip the flows need.
pub struct ClusterOperations {
    runner: Box<dyn CommandRunner>,
    logger: Box<dyn Logger>,
}

impl ClusterOperations {
    pub fn new(runner: Box<dyn CommandRunner>, logger: Box<dyn Logger>) -> Self {
        Self { runner, logger }
    }

    pub fn log(&mut self, message: &str) {
        self.logger.log(message);
    }

    pub fn debug_log(&mut self, message: &str) {
        self.logger.debug_log(message);
    }

    pub fn success(&mut self, message: &str) {
        self.logger.success(message);
    }

    pub fn logger(&mut self) -> &mut dyn Logger {
        self.logger.as_mut()
    }

    fn run(&mut self, args: Vec<String>) -> Result<String> {
        self.run_logged(args, true)
    }

    /// Same as `run`, but the output carries a credential and is never logged.
    fn run_secret(&mut self, args: Vec<String>) -> Result<String> {
        self.run_logged(args, false)
    }

    fn run_logged(&mut self, args: Vec<String>, log_stdout: bool) -> Result<String> {
        self.logger
            .debug_log(&format!("kubectl {}", redacted_args(&args)));
        let output = self.runner.run(&args)?;
        if log_stdout && !output.stdout.is_empty() {
            self.logger.debug_log(output.stdout.trim_end());
        }
        if !output.stderr.trim().is_empty() {
            self.logger.debug_log(output.stderr.trim_end());
        }
        Ok(output.stdout)
    }

    fn run_with_input(&mut self, args: Vec<String>, input: &str) -> Result<String> {
        self.logger
            .debug_log(&format!("kubectl {} <<EOF\n{}EOF", redacted_args(&args), input));
        let output = self.runner.run_with_input(&args, input)?;
        if !output.stdout.is_empty() {
            self.logger.debug_log(output.stdout.trim_end());
        }
        Ok(output.stdout)
    }

    fn run_to_file(&mut self, args: Vec<String>, path: &Path) -> Result<()> {
        self.logger.debug_log(&format!(
            "kubectl {} > {}",
            redacted_args(&args),
            path.display()
        ));
        self.runner.run_to_file(&args, path)?;
        Ok(())
    }

    pub fn get_contexts(&mut self, kubeconfig: &Path) -> Result<Vec<ClusterContext>> {
        let mut args = vec!["--kubeconfig".to_string(), kubeconfig.display().to_string()];
        args.extend(to_args(&["config", "get-contexts"]));
        let output = self.run(args)?;
        parse_contexts(&output)
    }

    /// `get <resource> -o=json`, optionally scoped to a namespace.
    pub fn list(
        &mut self,
        cluster: &Cluster,
        resource: &str,
        namespace: Option<&str>,
    ) -> Result<ResourceChoices> {
        let mut command = vec!["get", resource, "-o=json"];
        if let Some(ns) = namespace {
            command.extend(["-n", ns]);
        }
        let output = self.run(cluster.command(&command))?;
        Ok(ResourceList::parse(&output)?.choices())
    }

    pub fn create_namespace(&mut self, cluster: &Cluster, namespace: &str) -> Result<()> {
        let output = self.run(cluster.command(&["create", "namespace", namespace]))?;
        let output = output.trim();
        if !output.is_empty() {
            self.logger.success(output);
        }
        Ok(())
    }

    pub fn apply(&mut self, cluster: &Cluster, manifest: &str) -> Result<()> {
        let output = self.run_with_input(cluster.command(&["apply", "-f", "-"]), manifest)?;
        for line in output.lines().filter(|l| !l.trim().is_empty()) {
            self.logger.success(line);
        }
        Ok(())
    }

    /// Bearer token from the first secret referenced by the service account.
    pub fn get_token(&mut self, cluster: &Cluster, sa: &ServiceAccount) -> Result<String> {
        let secret = self.run(cluster.command(&[
            "get",
            "serviceaccount",
            &sa.name,
            "-n",
            &sa.namespace,
            "-o",
            "jsonpath={.secrets[0].name}",
        ]))?;
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(ToolError::NotFound {
                kind: "token secret for service account",
                name: format!("{}/{}", sa.namespace, sa.name),
            });
        }

        let encoded = self.run_secret(cluster.command(&[
            "get",
            "secret",
            secret,
            "-n",
            &sa.namespace,
            "-o",
            "jsonpath={.data.token}",
        ]))?;
        let decoded = general_purpose::STANDARD.decode(encoded.trim())?;
        String::from_utf8(decoded)
            .map_err(|_| ToolError::Format(format!("token in secret `{}` is not UTF-8", secret)))
    }

    pub fn kubectl_version(&mut self) -> Result<KubectlVersion> {
        let output = self.run(to_args(&["version", "-o=json", "--client"]))?;
        KubectlVersion::parse(&output)
    }

    /// Server URL and CA data of the selected cluster, decoded according to
    /// the client version.
    pub fn get_cluster_info(&mut self, cluster: &Cluster) -> Result<ClusterInfo> {
        let version = self.kubectl_version()?;
        let format = version.ca_data_format()?;
        self.logger.debug_log(&format!(
            "kubectl client {}.{}: certificate-authority-data as {:?}",
            version.client_version.major, version.client_version.minor, format
        ));

        let jsonpath = cluster_info_jsonpath(&cluster.context.cluster_name);
        let output = self.run(cluster.command(&["config", "view", "--raw", "-o", &jsonpath]))?;
        parse_cluster_info(&output, format)
    }

    /// Read-only probe with a freshly written kubeconfig.
    pub fn check_connectivity(&mut self, kubeconfig: &Path, namespace: &str) -> Result<()> {
        let args = vec![
            "--kubeconfig".to_string(),
            kubeconfig.display().to_string(),
            "get".to_string(),
            "pods".to_string(),
            "-n".to_string(),
            namespace.to_string(),
        ];
        self.run(args).map(|_| ())
    }

    /// `kubectl --kubeconfig <file> config <command>`.
    pub fn config(&mut self, kubeconfig: &Path, command: &[&str]) -> Result<()> {
        let mut args = vec![
            "--kubeconfig".to_string(),
            kubeconfig.display().to_string(),
            "config".to_string(),
        ];
        args.extend(to_args(command));
        let output = self.run(args)?;
        let output = output.trim();
        if !output.is_empty() {
            self.logger.debug_log(output);
        }
        Ok(())
    }

    /// `kubectl --kubeconfig <file> config view <flags>` written to `dest`.
    pub fn view_to_file(&mut self, kubeconfig: &Path, flags: &[&str], dest: &Path) -> Result<()> {
        let mut args = vec![
            "--kubeconfig".to_string(),
            kubeconfig.display().to_string(),
            "config".to_string(),
            "view".to_string(),
        ];
        args.extend(to_args(flags));
        self.run_to_file(args, dest)
    }
}
