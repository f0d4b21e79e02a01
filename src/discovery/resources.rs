// src/discovery/resources.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{Result, ToolError};
use crate::prompt::Prompter;

/// Envelope of `kubectl get <resource> -o=json`.
#[derive(Debug, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub items: Vec<ResourceItem>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceItem {
    pub metadata: ItemMetadata,
    #[serde(default)]
    pub status: Option<ItemStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    pub name: String,
    #[serde(default)]
    pub creation_timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

/// Parallel lists: what the operator sees and the names behind them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceChoices {
    pub display: Vec<String>,
    pub names: Vec<String>,
}

fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

impl ResourceList {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn choices(&self) -> ResourceChoices {
        let width = self
            .items
            .iter()
            .map(|i| i.metadata.name.len())
            .max()
            .unwrap_or(0);

        let mut choices = ResourceChoices::default();
        for item in &self.items {
            let mut line = format!("{:<width$}", item.metadata.name, width = width);
            if let Some(ts) = &item.metadata.creation_timestamp {
                line.push(' ');
                line.push_str(&format_timestamp(ts));
            }
            if let Some(phase) = item.status.as_ref().and_then(|s| s.phase.as_ref()) {
                line.push(' ');
                line.push_str(phase);
            }
            choices.display.push(line.trim_end().to_string());
            choices.names.push(item.metadata.name.clone());
        }
        choices
    }
}

impl ResourceChoices {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Resolves `requested` if given (it must exist), otherwise asks.
    pub fn resolve(
        &self,
        kind: &'static str,
        requested: Option<&str>,
        prompter: &mut dyn Prompter,
        label: &str,
    ) -> Result<String> {
        match requested {
            Some(name) if self.contains(name) => Ok(name.to_string()),
            Some(name) => Err(ToolError::NotFound {
                kind,
                name: name.to_string(),
            }),
            None => self.select(kind, prompter, label),
        }
    }

    pub fn select(
        &self,
        kind: &'static str,
        prompter: &mut dyn Prompter,
        label: &str,
    ) -> Result<String> {
        if self.names.is_empty() {
            return Err(ToolError::NotFound {
                kind,
                name: "any".to_string(),
            });
        }
        let idx = prompter.select(label, &self.display)?;
        Ok(self.names[idx].clone())
    }
}
