// src/kubectl/cluster_info.rs
use url::Url;

use super::version::CaDataFormat;
use crate::error::{Result, ToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub server: String,
    /// Standard base64 of the PEM bundle.
    pub ca_data: String,
}

/// jsonpath selecting `server` and `certificate-authority-data` of one cluster.
pub fn cluster_info_jsonpath(cluster_name: &str) -> String {
    format!(
        "jsonpath={{.clusters[?(@.name=='{}')].cluster['server','certificate-authority-data']}}",
        cluster_name
    )
}

/// Parses `<server> <ca-data>` as printed by `config view --raw -o jsonpath`.
pub fn parse_cluster_info(output: &str, format: CaDataFormat) -> Result<ClusterInfo> {
    let output = output.trim_end_matches(['\n', '\r']);
    let split = output.find(' ');

    let idx = match split {
        Some(i) if output.len() >= 5 && i >= 3 => i,
        _ => {
            return Err(ToolError::Format(
                "unexpected return format for cluster properties".to_string(),
            ))
        }
    };

    let server = &output[..idx];
    Url::parse(server).map_err(|e| {
        ToolError::Format(format!("cluster server `{}` is not a valid URL: {}", server, e))
    })?;

    let ca_data = format.decode(&output[idx..])?;

    Ok(ClusterInfo {
        server: server.to_string(),
        ca_data,
    })
}
