// src/utils/logging.rs
use chrono::Local;
use crossterm::style::Stylize;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

pub trait Logger {
    fn log(&mut self, message: &str);
    fn debug_log(&mut self, message: &str);

    fn success(&mut self, message: &str) {
        self.log(message);
    }

    fn warn(&mut self, message: &str) {
        self.log(message);
    }
}

/// Colored progress output on the terminal. Debug lines are only printed in
/// verbose mode.
#[derive(Debug, Default)]
pub struct ConsoleLogger {
    verbose: bool,
}

impl ConsoleLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Logger for ConsoleLogger {
    fn log(&mut self, message: &str) {
        println!("{}", message.blue());
    }

    fn debug_log(&mut self, message: &str) {
        if self.verbose {
            println!("{}", message.yellow());
        }
    }

    fn success(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn warn(&mut self, message: &str) {
        eprintln!("{}", message.red());
    }
}

#[derive(Debug)]
pub struct FileLogger {
    log_file: PathBuf,
    debug: bool,
}

impl FileLogger {
    pub fn new(log_file: &Path, debug: bool) -> std::io::Result<Self> {
        // Create log directory if it doesn't exist
        if let Some(parent) = log_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(FileLogger {
            log_file: log_file.to_path_buf(),
            debug,
        })
    }

    fn write_to_file(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        writeln!(file, "{}: {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message)
    }
}

impl Logger for FileLogger {
    fn log(&mut self, message: &str) {
        if let Err(e) = self.write_to_file(message) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    fn debug_log(&mut self, message: &str) {
        if self.debug {
            if let Err(e) = self.write_to_file(&format!("[DEBUG] {}", message)) {
                eprintln!("Failed to write debug log: {}", e);
            }
        }
    }

    fn warn(&mut self, message: &str) {
        self.log(&format!("[WARN] {}", message));
    }
}

// MultiLogger allows logging to multiple destinations
pub struct MultiLogger {
    loggers: Vec<Box<dyn Logger>>,
}

impl MultiLogger {
    pub fn new(loggers: Vec<Box<dyn Logger>>) -> Self {
        Self { loggers }
    }
}

impl Logger for MultiLogger {
    fn log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.log(message);
        }
    }

    fn debug_log(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.debug_log(message);
        }
    }

    fn success(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.success(message);
        }
    }

    fn warn(&mut self, message: &str) {
        for logger in &mut self.loggers {
            logger.warn(message);
        }
    }
}
