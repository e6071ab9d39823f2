use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use parking_lot::Mutex;

use super::Environment;
use super::LogLevel;
use super::ProcessCommand;
use super::ProcessOutput;

pub const LOG_LEVEL_ENV_VAR_NAME: &str = "CODE_FORMATTERS_LOG_LEVEL";

#[derive(Clone, Debug)]
pub struct RealEnvironmentOptions {
  pub log_level: LogLevel,
}

impl Default for RealEnvironmentOptions {
  fn default() -> Self {
    RealEnvironmentOptions { log_level: LogLevel::Info }
  }
}

#[derive(Clone)]
pub struct RealEnvironment {
  output_lock: Arc<Mutex<()>>,
  log_level: LogLevel,
}

impl RealEnvironment {
  pub fn new(options: &RealEnvironmentOptions) -> RealEnvironment {
    RealEnvironment {
      output_lock: Default::default(),
      log_level: options.log_level,
    }
  }

  /// Creates an environment configured from the process' environment variables.
  pub fn from_env() -> RealEnvironment {
    let level_text = std::env::var(LOG_LEVEL_ENV_VAR_NAME).ok();
    let parsed = level_text.as_deref().map(|text| text.parse::<LogLevel>());
    let log_level = match &parsed {
      Some(Ok(level)) => *level,
      _ => RealEnvironmentOptions::default().log_level,
    };
    let environment = RealEnvironment::new(&RealEnvironmentOptions { log_level });
    if let Some(Err(err)) = parsed {
      log_warn!(environment, "Ignoring {} environment variable. {}", LOG_LEVEL_ENV_VAR_NAME, err);
    }
    environment
  }
}

impl Environment for RealEnvironment {
  fn var(&self, name: &str) -> Option<String> {
    std::env::var(name).ok()
  }

  fn path_exists(&self, path: &Path) -> bool {
    log_debug!(self, "Checking path exists: {}", path.display());
    path.exists()
  }

  fn which(&self, command_name: &str) -> Result<PathBuf> {
    log_debug!(self, "Searching path for executable: {}", command_name);
    which::which(command_name).with_context(|| format!("Could not find executable '{}' on the path.", command_name))
  }

  fn run_process(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
    log_debug!(self, "Running {} with {} argument(s)", command.program.display(), command.args.len());
    let mut child = Command::new(&command.program)
      .args(&command.args)
      .envs(command.envs.iter().map(|(key, value)| (key, value)))
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .with_context(|| format!("Failed to start {}", command.program.display()))?;

    // write on another thread so a child filling its stdout pipe can't deadlock us
    let stdin_writer = child.stdin.take().map(|mut stdin| {
      let bytes = command.stdin.clone();
      std::thread::spawn(move || stdin.write_all(&bytes))
    });

    let output = child
      .wait_with_output()
      .with_context(|| format!("Failed waiting on {}", command.program.display()))?;

    if let Some(handle) = stdin_writer {
      // a child that exits without reading stdin causes a broken pipe, which is not our failure
      if let Ok(Err(err)) = handle.join() {
        log_debug!(self, "Failed writing stdin for {}: {}", command.program.display(), err);
      }
    }

    Ok(ProcessOutput {
      exit_code: output.status.code(),
      stdout: output.stdout,
      stderr: output.stderr,
    })
  }

  fn log_level(&self) -> LogLevel {
    self.log_level
  }

  #[allow(clippy::print_stderr)]
  fn log_stderr_with_context(&self, text: &str, context_name: &str) {
    let _g = self.output_lock.lock();
    eprintln!("[{}] {}", context_name, text);
  }
}
