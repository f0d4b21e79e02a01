// src/prompt/testing.rs
use std::collections::VecDeque;

use super::{PromptError, Prompter};

#[derive(Debug, Clone)]
pub enum Answer {
    Select(usize),
    Input(String),
    /// Accept whatever default the prompt offers.
    Default,
}

/// Replays canned answers; running out of answers behaves like Ctrl-C.
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            asked: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, label: &str, options: &[String]) -> Result<usize, PromptError> {
        self.asked.push(label.to_string());
        match self.answers.pop_front() {
            Some(Answer::Select(idx)) if idx < options.len() => Ok(idx),
            Some(Answer::Default) if !options.is_empty() => Ok(0),
            Some(other) => panic!("unexpected answer {:?} for select `{}`", other, label),
            None => Err(PromptError::Cancelled),
        }
    }

    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String, PromptError> {
        self.asked.push(label.to_string());
        match self.answers.pop_front() {
            Some(Answer::Input(value)) => Ok(value),
            Some(Answer::Default) => default
                .map(str::to_string)
                .ok_or_else(|| PromptError::NoOptions(label.to_string())),
            Some(other) => panic!("unexpected answer {:?} for input `{}`", other, label),
            None => Err(PromptError::Cancelled),
        }
    }
}
