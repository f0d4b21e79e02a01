mod kube;
mod types;

pub use kube::KubeConfigGenerator;
pub use types::{KubeConfig, ServiceAccountContext};
