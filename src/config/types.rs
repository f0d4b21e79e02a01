// config/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::{Result, ToolError};

/// How the service account kubeconfig is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KubeconfigMethod {
    /// Rendered from the cluster's server URL and CA data.
    #[default]
    Template,
    /// Cut down from a copy of the source kubeconfig with `kubectl config`.
    Minify,
}

/// Optional JSON file of defaults for anything not given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolDefaults {
    pub kubectl: Option<String>,
    pub kubeconfig: Option<String>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub service_account: Option<String>,
    pub output: Option<String>,
    pub log_file: Option<String>,
    pub method: Option<KubeconfigMethod>,
}

impl ToolDefaults {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
        Ok(serde_json::from_str(&config_str)?)
    }
}

/// Everything one flow run needs to know up front. Unset fields are asked
/// for interactively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowConfig {
    pub source_kubeconfig: Option<String>,
    pub output: Option<String>,
    pub context: Option<String>,
    pub namespace: Option<String>,
    pub service_account: Option<String>,
    /// Comma separated, as typed.
    pub target_namespaces: Option<String>,
    pub verbose: bool,
    pub method: Option<KubeconfigMethod>,
}

impl FlowConfig {
    /// Fills whatever the command line left unset from `defaults`.
    pub fn with_defaults(mut self, defaults: &ToolDefaults) -> Self {
        fn fill(field: &mut Option<String>, default: &Option<String>) {
            if field.is_none() {
                *field = default.clone();
            }
        }

        fill(&mut self.source_kubeconfig, &defaults.kubeconfig);
        fill(&mut self.output, &defaults.output);
        fill(&mut self.context, &defaults.context);
        fill(&mut self.namespace, &defaults.namespace);
        fill(&mut self.service_account, &defaults.service_account);
        self.method = self.method.or(defaults.method);
        self
    }

    pub fn method(&self) -> KubeconfigMethod {
        self.method.unwrap_or_default()
    }
}
