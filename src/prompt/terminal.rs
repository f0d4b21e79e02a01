// src/prompt/terminal.rs
use dialoguer::{theme::ColorfulTheme, Input, Select};

use super::{PromptError, Prompter};

fn terminal_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
            PromptError::Cancelled
        }
        dialoguer::Error::IO(e) => PromptError::Terminal(e.to_string()),
    }
}

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, label: &str, options: &[String]) -> Result<usize, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions(label.to_string()));
        }

        Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(terminal_error)?
            .ok_or(PromptError::Cancelled)
    }

    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(label);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(terminal_error)
    }
}
