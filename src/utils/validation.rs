// src/utils/validation.rs
use regex::Regex;
use std::sync::OnceLock;

use crate::error::ToolError;

/// RFC 1123 label as accepted for namespace and service account names.
const NAME_PATTERN: &str = r"^[a-z]([-a-z0-9]*[a-z0-9])?$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"))
}

pub fn validate_name(name: &str) -> Result<(), ToolError> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(ToolError::InvalidName(name.to_string()))
    }
}

/// Splits a comma-separated namespace list, dropping blank entries.
pub fn parse_target_namespaces(raw: &str) -> Result<Vec<String>, ToolError> {
    let mut targets = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        validate_name(entry)?;
        if !targets.iter().any(|t| t == entry) {
            targets.push(entry.to_string());
        }
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_names() {
        for name in ["a", "spinnaker", "spinnaker-sa", "ns-1", "a1b2", "x-y-z9"] {
            assert!(validate_name(name).is_ok(), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_invalid_names() {
        for name in [
            "",
            "1abc",
            "-abc",
            "abc-",
            "Spinnaker",
            "spin_naker",
            "spin.naker",
            "spin naker",
            "spinnaker\n",
        ] {
            assert!(
                matches!(validate_name(name), Err(ToolError::InvalidName(_))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_parse_target_namespaces() {
        let targets = parse_target_namespaces(" dev, staging,,prod ,dev").unwrap();
        assert_eq!(targets, vec!["dev", "staging", "prod"]);

        assert!(parse_target_namespaces("").unwrap().is_empty());
        assert!(parse_target_namespaces("dev,Prod").is_err());
    }
}
