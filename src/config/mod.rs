mod paths;
mod types;

pub use paths::{resolve_output_path, resolve_source_kubeconfig};
pub use types::{FlowConfig, KubeconfigMethod, ToolDefaults};
