// src/kubectl/version.rs
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use crate::error::{Result, ToolError};

/// First client minor version that prints `certificate-authority-data` as
/// base64 instead of a decimal byte array.
pub const BASE64_CA_MINOR_VERSION: u32 = 12;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KubectlVersionDetails {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KubectlVersion {
    pub client_version: KubectlVersionDetails,
}

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[^0-9]+").expect("digit filter is a valid regex"))
}

impl KubectlVersion {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Minor version with suffixes such as `+` or `-eks` stripped.
    pub fn minor(&self) -> Result<u32> {
        let digits = non_digits().replace_all(&self.client_version.minor, "");
        digits.parse::<u32>().map_err(|_| {
            ToolError::Format(format!(
                "kubectl client minor version `{}` is not numeric",
                self.client_version.minor
            ))
        })
    }

    pub fn ca_data_format(&self) -> Result<CaDataFormat> {
        Ok(CaDataFormat::for_minor(self.minor()?))
    }
}

/// How `config view -o jsonpath` prints `certificate-authority-data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaDataFormat {
    /// `[45 45 45 ...]`, one decimal number per byte.
    ByteArray,
    /// Already base64 encoded.
    Base64,
}

impl CaDataFormat {
    pub fn for_minor(minor: u32) -> Self {
        if minor < BASE64_CA_MINOR_VERSION {
            CaDataFormat::ByteArray
        } else {
            CaDataFormat::Base64
        }
    }

    /// Turns the raw jsonpath field into standard base64.
    pub fn decode(&self, raw: &str) -> Result<String> {
        let raw = raw.trim();
        match self {
            CaDataFormat::Base64 => {
                if raw.is_empty() {
                    return Err(ToolError::Format(
                        "cluster has no certificate-authority-data".to_string(),
                    ));
                }
                Ok(raw.to_string())
            }
            CaDataFormat::ByteArray => {
                let inner = raw.trim_start_matches('[').trim_end_matches(']');
                let bytes = inner
                    .split_whitespace()
                    .map(|b| {
                        b.parse::<u8>().map_err(|_| {
                            ToolError::Format(format!(
                                "`{}` is not a byte in certificate-authority-data",
                                b
                            ))
                        })
                    })
                    .collect::<Result<Vec<u8>>>()?;
                if bytes.is_empty() {
                    return Err(ToolError::Format(
                        "cluster has no certificate-authority-data".to_string(),
                    ));
                }
                Ok(general_purpose::STANDARD.encode(bytes))
            }
        }
    }
}
