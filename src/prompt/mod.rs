// src/prompt/mod.rs
mod terminal;

#[cfg(test)]
pub mod testing;

pub use terminal::TerminalPrompter;

use thiserror::Error;

use crate::error::ToolError;
use crate::utils::logging::Logger;
use crate::utils::validation::validate_name;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled")]
    Cancelled,

    #[error("nothing to choose from for `{0}`")]
    NoOptions(String),

    #[error("terminal prompt failed: {0}")]
    Terminal(String),
}

/// Interactive input used by the flows to fill in missing parameters.
pub trait Prompter {
    /// Returns the index of the chosen option.
    fn select(&mut self, label: &str, options: &[String]) -> Result<usize, PromptError>;

    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError>;
}

/// Asks until the answer is a valid Kubernetes name or the prompt is aborted.
pub fn prompt_name(
    prompter: &mut dyn Prompter,
    logger: &mut dyn Logger,
    label: &str,
    default: Option<&str>,
) -> Result<String, ToolError> {
    loop {
        let answer = prompter.input(label, default)?;
        let answer = answer.trim();
        match validate_name(answer) {
            Ok(()) => return Ok(answer.to_string()),
            Err(e) => logger.warn(&e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Answer, ScriptedPrompter};
    use super::*;
    use crate::utils::logging::testing::MockLogger;

    #[test]
    fn test_prompt_name_retries_until_valid() {
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Input("Bad_Name".to_string()),
            Answer::Input("-nope".to_string()),
            Answer::Input(" spinnaker-sa ".to_string()),
        ]);
        let logger = MockLogger::new();
        let mut sink = logger.clone();

        let name = prompt_name(&mut prompter, &mut sink, "Service account", None).unwrap();

        assert_eq!(name, "spinnaker-sa");
        assert!(logger.contains("WARN: invalid name `Bad_Name`"));
        assert!(prompter.is_exhausted());
    }

    #[test]
    fn test_prompt_name_stops_when_cancelled() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Input("UPPER".to_string())]);
        let mut logger = MockLogger::new();

        let err = prompt_name(&mut prompter, &mut logger, "Namespace", None).unwrap_err();

        assert!(matches!(err, ToolError::Prompt(PromptError::Cancelled)));
    }
}
