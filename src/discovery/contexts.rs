// src/discovery/contexts.rs
use crate::error::{Result, ToolError};
use crate::prompt::Prompter;
use crate::types::ClusterContext;

const CLUSTER_PROMPT: &str = "Choose the Kubernetes cluster to deploy to";

/// The token starting exactly at `offset`; a blank cell is empty.
fn column_value(line: &str, offset: usize) -> &str {
    match line.get(offset..) {
        Some(rest) if !rest.starts_with(char::is_whitespace) => {
            rest.split_whitespace().next().unwrap_or("")
        }
        _ => "",
    }
}

/// Parses the table printed by `kubectl config get-contexts`:
///
/// ```text
/// CURRENT   NAME     CLUSTER          AUTHINFO   NAMESPACE
/// *         prod     prod-cluster     prod-admin
///           staging  staging-cluster  staging-admin
/// ```
pub fn parse_contexts(output: &str) -> Result<Vec<ClusterContext>> {
    let mut lines = output.lines();
    let header = lines.next().unwrap_or("");

    let (name_idx, cluster_idx) = match (header.find("NAME"), header.find("CLUSTER")) {
        (Some(n), Some(c)) => (n, c),
        _ => {
            return Err(ToolError::Format(
                "unrecognized context format".to_string(),
            ))
        }
    };

    let mut contexts = Vec::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let context_name = column_value(line, name_idx);
        if context_name.is_empty() {
            return Err(ToolError::Format(format!(
                "context line without a name: `{}`",
                line.trim_end()
            )));
        }
        let cluster_name = column_value(line, cluster_idx);
        if cluster_name.is_empty() {
            return Err(ToolError::Format(format!(
                "context `{}` has no cluster",
                context_name
            )));
        }
        contexts.push(ClusterContext {
            context_name: context_name.to_string(),
            cluster_name: cluster_name.to_string(),
        });
    }

    if contexts.is_empty() {
        return Err(ToolError::Format(
            "no contexts in provided kubeconfig".to_string(),
        ));
    }
    Ok(contexts)
}

/// Picks the requested context, or asks the operator when none was given.
pub fn select_context(
    contexts: &[ClusterContext],
    requested: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<ClusterContext> {
    if let Some(name) = requested {
        return contexts
            .iter()
            .find(|c| c.context_name == name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound {
                kind: "context",
                name: name.to_string(),
            });
    }

    let options: Vec<String> = contexts
        .iter()
        .map(|c| format!("{} [ {} ]", c.cluster_name, c.context_name))
        .collect();
    let idx = prompter.select(CLUSTER_PROMPT, &options)?;
    Ok(contexts[idx].clone())
}
