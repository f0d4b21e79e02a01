// src/kubectl/mod.rs
mod cluster_info;
mod runner;
mod version;

#[cfg(test)]
pub mod testing;

pub use cluster_info::{cluster_info_jsonpath, parse_cluster_info, ClusterInfo};
pub use runner::{redacted_args, CommandRunner, KubectlError, KubectlRunner};
pub use version::KubectlVersion;
