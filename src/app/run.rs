// src/app/run.rs
use std::path::PathBuf;

use super::AccountManager;
use crate::config::FlowConfig;
use crate::error::StepError;

/// Creates (or updates) a service account with its grants and writes a
/// kubeconfig for it.
pub fn create_service_account(
    manager: &mut AccountManager,
    config: &FlowConfig,
) -> Result<PathBuf, StepError> {
    let cluster = manager.define_cluster(config)?;
    let sa = manager.define_service_account(&cluster, config)?;
    let output = manager.define_output(config)?;

    manager.create_service_account_objects(&cluster, &sa)?;
    manager.generate_kubeconfig(&cluster, &sa, config.method(), &output)
}

/// Writes a kubeconfig for a service account that already exists. Creates
/// nothing in the cluster.
pub fn create_kubeconfig(
    manager: &mut AccountManager,
    config: &FlowConfig,
) -> Result<PathBuf, StepError> {
    let cluster = manager.define_cluster(config)?;
    let sa = manager.select_service_account(&cluster, config)?;
    let output = manager.define_output(config)?;

    manager.generate_kubeconfig(&cluster, &sa, config.method(), &output)
}
