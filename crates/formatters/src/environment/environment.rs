use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
  Debug = 0,
  Info = 1,
  Warn = 2,
  Error = 3,
  Silent = 4,
}

impl LogLevel {
  pub fn is_debug(&self) -> bool {
    *self == LogLevel::Debug
  }

  pub fn is_warn(&self) -> bool {
    *self <= LogLevel::Warn
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid log level '{0}'. Expected one of: debug, info, warn, error, silent")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
  type Err = ParseLogLevelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "debug" => Ok(LogLevel::Debug),
      "info" => Ok(LogLevel::Info),
      "warn" => Ok(LogLevel::Warn),
      "error" => Ok(LogLevel::Error),
      "silent" => Ok(LogLevel::Silent),
      _ => Err(ParseLogLevelError(s.to_string())),
    }
  }
}

/// A process to run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
  pub program: PathBuf,
  pub args: Vec<String>,
  pub envs: Vec<(String, String)>,
  /// Bytes written to the process' stdin before it is closed.
  pub stdin: Vec<u8>,
}

impl ProcessCommand {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    ProcessCommand {
      program: program.into(),
      args: Vec::new(),
      envs: Vec::new(),
      stdin: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.envs.push((key.into(), value.into()));
    self
  }

  pub fn stdin(mut self, bytes: Vec<u8>) -> Self {
    self.stdin = bytes;
    self
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  /// `None` when the process was terminated by a signal.
  pub exit_code: Option<i32>,
  pub stdout: Vec<u8>,
  pub stderr: Vec<u8>,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.exit_code == Some(0)
  }
}

pub trait Environment: Clone + Send + Sync + 'static {
  fn var(&self, name: &str) -> Option<String>;
  fn path_exists(&self, path: &Path) -> bool;
  /// Finds an executable on the path.
  fn which(&self, command_name: &str) -> Result<PathBuf>;
  fn run_process(&self, command: &ProcessCommand) -> Result<ProcessOutput>;
  fn log_level(&self) -> LogLevel;
  fn log_stderr(&self, text: &str) {
    self.log_stderr_with_context(text, "code-formatters");
  }
  /// Logs to stderr providing the context name.
  /// Ex. the formatter that produced the message.
  fn log_stderr_with_context(&self, text: &str, context_name: &str);
}

// use a macro here so the expression provided is only evaluated when in debug mode
macro_rules! log_debug {
  ($environment:expr, $($arg:tt)*) => {
    if $environment.log_level().is_debug() {
      let mut text = String::from("[DEBUG] ");
      text.push_str(&format!($($arg)*));
      $environment.log_stderr(&text);
    }
  }
}

macro_rules! log_warn {
  ($environment:expr, $($arg:tt)*) => {
    if $environment.log_level().is_warn() {
      $environment.log_stderr(&format!($($arg)*));
    }
  }
}
