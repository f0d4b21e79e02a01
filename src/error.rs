// src/error.rs
use std::{io, path::PathBuf};
use thiserror::Error;

use crate::kubectl::KubectlError;
use crate::manifest::ManifestError;
use crate::prompt::PromptError;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Kubectl(#[from] KubectlError),

    #[error("unexpected kubectl output: {0}")]
    Format(String),

    #[error("unable to decode kubectl JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid name `{0}`: must consist of lower case alphanumeric characters or '-', and start and end with an alphanumeric character")]
    InvalidName(String),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("{kind} `{name}` not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ToolError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// The failure of one flow step: a short operator-facing diagnostic plus the
/// underlying error.
#[derive(Error, Debug)]
#[error("{diagnostic}")]
pub struct StepError {
    pub diagnostic: String,
    #[source]
    pub source: ToolError,
}

impl StepError {
    /// Diagnostic followed by every message in the source chain.
    pub fn report(&self) -> Vec<String> {
        let mut lines = vec![self.diagnostic.clone()];
        let mut cause: Option<&dyn std::error::Error> = Some(&self.source);
        while let Some(err) = cause {
            lines.push(err.to_string());
            cause = err.source();
        }
        lines
    }
}

pub trait Diagnose<T> {
    fn diagnose(self, diagnostic: impl Into<String>) -> std::result::Result<T, StepError>;
}

impl<T, E> Diagnose<T> for std::result::Result<T, E>
where
    E: Into<ToolError>,
{
    fn diagnose(self, diagnostic: impl Into<String>) -> std::result::Result<T, StepError> {
        self.map_err(|e| StepError {
            diagnostic: diagnostic.into(),
            source: e.into(),
        })
    }
}
