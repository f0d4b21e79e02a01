// src/manifest/mod.rs
mod render;
mod types;

use thiserror::Error;

pub use render::{
    admin_binding_manifest, namespace_binding_manifest, render_kubeconfig,
    service_account_manifest,
};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot render {document}: {field} is empty")]
    MissingField {
        document: &'static str,
        field: &'static str,
    },

    #[error("cannot render {document}: {source}")]
    Serialize {
        document: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
}
