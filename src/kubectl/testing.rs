// src/kubectl/testing.rs
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::runner::{redacted_args, CommandOutput, CommandRunner, KubectlError};

#[derive(Debug, Clone)]
pub struct Call {
    pub args: Vec<String>,
    pub input: Option<String>,
    pub file: Option<PathBuf>,
}

impl Call {
    pub fn has(&self, tokens: &[&str]) -> bool {
        contains_sequence(&self.args, tokens)
    }
}

#[derive(Debug, Clone)]
struct Rule {
    tokens: Vec<String>,
    stdout: String,
    stderr: String,
    success: bool,
}

fn contains_sequence(args: &[String], tokens: &[&str]) -> bool {
    if tokens.is_empty() {
        return true;
    }
    args.windows(tokens.len())
        .any(|w| w.iter().zip(tokens).all(|(a, t)| a == t))
}

/// Scripted stand-in for kubectl. A call is answered by the first rule whose
/// tokens appear contiguously in its arguments; unmatched calls succeed with
/// empty output. Clones share state.
#[derive(Clone, Default)]
pub struct FakeRunner {
    rules: Rc<RefCell<Vec<Rule>>>,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, tokens: &[&str], stdout: &str) -> &Self {
        self.push(tokens, stdout, "", true)
    }

    pub fn fail(&self, tokens: &[&str], stderr: &str) -> &Self {
        self.push(tokens, "", stderr, false)
    }

    fn push(&self, tokens: &[&str], stdout: &str, stderr: &str, success: bool) -> &Self {
        self.rules.borrow_mut().push(Rule {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            success,
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn calls_with(&self, tokens: &[&str]) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.has(tokens)).collect()
    }

    fn answer(&self, call: Call) -> Result<CommandOutput, KubectlError> {
        let rule = self
            .rules
            .borrow()
            .iter()
            .find(|r| {
                let tokens: Vec<&str> = r.tokens.iter().map(String::as_str).collect();
                contains_sequence(&call.args, &tokens)
            })
            .cloned();
        let command = format!("kubectl {}", redacted_args(&call.args));
        self.calls.borrow_mut().push(call);

        match rule {
            Some(rule) if !rule.success => Err(KubectlError::Exit {
                command,
                status: "exit status: 1".to_string(),
                stdout: rule.stdout,
                stderr: rule.stderr,
            }),
            Some(rule) => Ok(CommandOutput {
                stdout: rule.stdout,
                stderr: rule.stderr,
            }),
            None => Ok(CommandOutput::default()),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, args: &[String]) -> Result<CommandOutput, KubectlError> {
        self.answer(Call {
            args: args.to_vec(),
            input: None,
            file: None,
        })
    }

    fn run_to_file(&mut self, args: &[String], path: &Path) -> Result<(), KubectlError> {
        let output = self.answer(Call {
            args: args.to_vec(),
            input: None,
            file: Some(path.to_path_buf()),
        })?;
        fs::write(path, output.stdout).map_err(|source| KubectlError::Stream {
            command: format!("kubectl {}", redacted_args(args)),
            source,
        })
    }

    fn run_with_input(
        &mut self,
        args: &[String],
        input: &str,
    ) -> Result<CommandOutput, KubectlError> {
        self.answer(Call {
            args: args.to_vec(),
            input: Some(input.to_string()),
            file: None,
        })
    }
}
