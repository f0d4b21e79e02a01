// src/kubectl/runner.rs
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KubectlError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed ({status}): {}", .stderr.trim())]
    Exit {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("unable to write to `{command}`: {source}")]
    Stream {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl KubectlError {
    pub fn stderr(&self) -> Option<&str> {
        match self {
            KubectlError::Exit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

const SECRET_FLAGS: &[&str] = &["--token"];

/// Arguments joined for display, with the values of credential flags masked.
pub fn redacted_args(args: &[String]) -> String {
    let mut shown = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            shown.push("***");
            hide_next = false;
            continue;
        }
        match arg.split_once('=') {
            Some((flag, _)) if SECRET_FLAGS.contains(&flag) => shown.push("--token=***"),
            _ => {
                hide_next = SECRET_FLAGS.contains(&arg.as_str());
                shown.push(arg.as_str());
            }
        }
    }
    shown.join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes the external cluster CLI.
pub trait CommandRunner {
    /// Runs with captured stdout and stderr.
    fn run(&mut self, args: &[String]) -> Result<CommandOutput, KubectlError>;

    /// Runs with stdout streamed into `path`, which is created or truncated.
    fn run_to_file(&mut self, args: &[String], path: &Path) -> Result<(), KubectlError>;

    /// Runs with `input` written to stdin.
    fn run_with_input(&mut self, args: &[String], input: &str)
        -> Result<CommandOutput, KubectlError>;
}

#[derive(Debug, Clone)]
pub struct KubectlRunner {
    program: String,
}

impl Default for KubectlRunner {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl KubectlRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        format!("{} {}", self.program, redacted_args(args))
    }

    fn launch_error(&self, source: io::Error) -> KubectlError {
        KubectlError::Launch {
            program: self.program.clone(),
            source,
        }
    }

    fn check(&self, args: &[String], output: Output) -> Result<CommandOutput, KubectlError> {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(KubectlError::Exit {
                command: self.command_line(args),
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}

impl CommandRunner for KubectlRunner {
    fn run(&mut self, args: &[String]) -> Result<CommandOutput, KubectlError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| self.launch_error(e))?;

        self.check(args, output)
    }

    fn run_to_file(&mut self, args: &[String], path: &Path) -> Result<(), KubectlError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let outfile = options.open(path).map_err(|source| KubectlError::Stream {
            command: self.command_line(args),
            source,
        })?;

        let output = Command::new(&self.program)
            .args(args)
            .stdout(Stdio::from(outfile))
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.launch_error(e))?;

        self.check(args, output).map(|_| ())
    }

    fn run_with_input(
        &mut self,
        args: &[String],
        input: &str,
    ) -> Result<CommandOutput, KubectlError> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        // stdin is dropped at the end of this block so the child sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|source| KubectlError::Stream {
                    command: self.command_line(args),
                    source,
                })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.launch_error(e))?;

        self.check(args, output)
    }
}
