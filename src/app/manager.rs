// src/app/manager.rs
use std::path::{Path, PathBuf};

use crate::cluster::ClusterOperations;
use crate::config::{resolve_output_path, resolve_source_kubeconfig, FlowConfig, KubeconfigMethod};
use crate::discovery::select_context;
use crate::error::{Diagnose, StepError, ToolError};
use crate::kubeconfig::KubeConfigGenerator;
use crate::manifest::{admin_binding_manifest, namespace_binding_manifest, service_account_manifest};
use crate::prompt::{prompt_name, Prompter};
use crate::types::{Cluster, ServiceAccount};
use crate::utils::validation::{parse_target_namespaces, validate_name};

const NAMESPACE_PROMPT: &str = "Namespace";
const NEW_NAMESPACE: &str = "New Namespace";
const SERVICE_ACCOUNT_SELECT_PROMPT: &str = "Service Account";
const SERVICE_ACCOUNT_NAME_PROMPT: &str = "What name would you like to give the service account";
const DEFAULT_SERVICE_ACCOUNT: &str = "spinnaker-service-account";

/// Drives the individual steps of both flows against one kubectl and one
/// operator.
pub struct AccountManager {
    ops: ClusterOperations,
    prompter: Box<dyn Prompter>,
    cwd: PathBuf,
}

impl AccountManager {
    pub fn new(ops: ClusterOperations, prompter: Box<dyn Prompter>, cwd: PathBuf) -> Self {
        Self { ops, prompter, cwd }
    }

    pub fn success(&mut self, message: &str) {
        self.ops.success(message);
    }

    pub fn define_cluster(&mut self, config: &FlowConfig) -> Result<Cluster, StepError> {
        let kubeconfig = resolve_source_kubeconfig(config.source_kubeconfig.as_deref())
            .diagnose("kubeconfig not readable")?;
        self.ops
            .debug_log(&format!("Using kubeconfig {}", kubeconfig.display()));

        self.ops.log("Getting contexts ...");
        let contexts = self
            .ops
            .get_contexts(&kubeconfig)
            .diagnose("Unable to get contexts from kubeconfig")?;

        let context = match select_context(&contexts, config.context.as_deref(), self.prompter.as_mut()) {
            Ok(context) => context,
            Err(e @ ToolError::NotFound { .. }) => return Err(e).diagnose("Provided context not found"),
            Err(e) => return Err(e).diagnose("No context selected"),
        };
        self.ops.debug_log(&format!(
            "Selected context {} on cluster {}",
            context.context_name, context.cluster_name
        ));

        Ok(Cluster::new(kubeconfig, context))
    }

    /// Namespace, name and grants for a service account that will be created
    /// (or updated) in the cluster.
    pub fn define_service_account(
        &mut self,
        cluster: &Cluster,
        config: &FlowConfig,
    ) -> Result<ServiceAccount, StepError> {
        let mut sa = ServiceAccount::default();

        if let Some(ns) = config.namespace.as_deref() {
            validate_name(ns).diagnose("Invalid namespace")?;
        }
        if let Some(name) = config.service_account.as_deref() {
            validate_name(name).diagnose("Invalid service account name")?;
        }
        if let Some(raw) = config.target_namespaces.as_deref() {
            sa.target_namespaces = parse_target_namespaces(raw).diagnose("Invalid target namespaces")?;
        }

        self.ops.log("Getting namespaces ...");
        let namespaces = self
            .ops
            .list(cluster, "namespaces", None)
            .diagnose("Unable to get namespaces from cluster")?;

        sa.namespace = match config.namespace.as_deref() {
            Some(ns) => ns.to_string(),
            None => {
                let mut options = namespaces.display.clone();
                options.push(NEW_NAMESPACE.to_string());
                let idx = self
                    .prompter
                    .select(NAMESPACE_PROMPT, &options)
                    .diagnose("Namespace not selected")?;
                match namespaces.names.get(idx) {
                    Some(name) => name.clone(),
                    None => prompt_name(self.prompter.as_mut(), self.ops.logger(), NEW_NAMESPACE, None)
                        .diagnose("Namespace not selected")?,
                }
            }
        };
        sa.new_namespace = !namespaces.contains(&sa.namespace);

        sa.name = match config.service_account.as_deref() {
            Some(name) => name.to_string(),
            None => prompt_name(
                self.prompter.as_mut(),
                self.ops.logger(),
                SERVICE_ACCOUNT_NAME_PROMPT,
                Some(DEFAULT_SERVICE_ACCOUNT),
            )
            .diagnose("Service account name not given")?,
        };

        sa.new_service_account = if sa.new_namespace {
            true
        } else {
            let accounts = self
                .ops
                .list(cluster, "serviceaccounts", Some(sa.namespace.as_str()))
                .diagnose("Unable to get list of service accounts in provided namespace")?;
            !accounts.contains(&sa.name)
        };
        if !sa.new_service_account {
            self.ops.log(&format!(
                "Service account {} already exists in namespace {}, its bindings will be updated",
                sa.name, sa.namespace
            ));
        }

        Ok(sa)
    }

    /// An existing service account in an existing namespace.
    pub fn select_service_account(
        &mut self,
        cluster: &Cluster,
        config: &FlowConfig,
    ) -> Result<ServiceAccount, StepError> {
        self.ops.log("Getting namespaces ...");
        let namespaces = self
            .ops
            .list(cluster, "namespaces", None)
            .diagnose("Unable to get namespaces from cluster")?;
        let namespace = namespaces
            .resolve(
                "namespace",
                config.namespace.as_deref(),
                self.prompter.as_mut(),
                NAMESPACE_PROMPT,
            )
            .diagnose(match config.namespace {
                Some(_) => "Provided namespace does not exist",
                None => "Namespace not selected",
            })?;

        self.ops.log("Getting service accounts ...");
        let accounts = self
            .ops
            .list(cluster, "serviceaccounts", Some(namespace.as_str()))
            .diagnose("Unable to get list of service accounts in provided namespace")?;
        let name = accounts
            .resolve(
                "service account",
                config.service_account.as_deref(),
                self.prompter.as_mut(),
                SERVICE_ACCOUNT_SELECT_PROMPT,
            )
            .diagnose(match config.service_account {
                Some(_) => "Provided service account does not exist",
                None => "Service account not selected",
            })?;

        Ok(ServiceAccount {
            namespace,
            name,
            ..Default::default()
        })
    }

    pub fn define_output(&mut self, config: &FlowConfig) -> Result<PathBuf, StepError> {
        resolve_output_path(config.output.as_deref(), self.prompter.as_mut(), &self.cwd)
            .diagnose("Unable to determine output file")
    }

    /// Namespace, service account and role bindings. Nothing is rolled back
    /// when a later object fails.
    pub fn create_service_account_objects(
        &mut self,
        cluster: &Cluster,
        sa: &ServiceAccount,
    ) -> Result<(), StepError> {
        if sa.new_namespace {
            self.ops.log(&format!("Creating namespace {} ...", sa.namespace));
            self.ops
                .create_namespace(cluster, &sa.namespace)
                .diagnose("Unable to create namespace")?;
        }

        self.ops
            .log(&format!("Creating service account {} ...", sa.name));
        let manifest = service_account_manifest(sa).diagnose("Unable to create service account")?;
        self.ops
            .apply(cluster, &manifest)
            .diagnose("Unable to create service account")?;

        if sa.is_cluster_admin() {
            self.ops.log("Granting cluster-admin ...");
            let manifest = admin_binding_manifest(sa).diagnose("Unable to create cluster role binding")?;
            self.ops
                .apply(cluster, &manifest)
                .diagnose("Unable to create cluster role binding")?;
        } else {
            for target in &sa.target_namespaces {
                self.ops
                    .log(&format!("Granting admin on namespace {} ...", target));
                let manifest = namespace_binding_manifest(sa, target)
                    .diagnose(format!("Unable to create role binding in namespace {}", target))?;
                self.ops
                    .apply(cluster, &manifest)
                    .diagnose(format!("Unable to create role binding in namespace {}", target))?;
            }
        }
        Ok(())
    }

    pub fn generate_kubeconfig(
        &mut self,
        cluster: &Cluster,
        sa: &ServiceAccount,
        method: KubeconfigMethod,
        output: &Path,
    ) -> Result<PathBuf, StepError> {
        KubeConfigGenerator::new(&mut self.ops, cluster).generate(method, sa, output)
    }
}
