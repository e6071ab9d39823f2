use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use anyhow::bail;
use parking_lot::Mutex;
use serde_json::Value;

use super::Environment;
use super::LogLevel;
use super::ProcessCommand;
use super::ProcessOutput;
use crate::FormatOptions;
use crate::Formatter;
use crate::python::DriverResponse;

/// An exception raised by a fake Python module.
#[derive(Debug, Clone)]
pub struct FakeException {
  pub exception_type: String,
  pub message: String,
}

impl FakeException {
  pub fn new(exception_type: &str, message: &str) -> Self {
    FakeException {
      exception_type: exception_type.to_string(),
      message: message.to_string(),
    }
  }
}

type FakeFormatFn = Arc<dyn Fn(&str, &FormatOptions) -> Result<String, FakeException> + Send + Sync>;
type ProcessOverrideFn = Arc<dyn Fn(&ProcessCommand) -> ProcessOutput + Send + Sync>;

/// In-memory environment that acts as a Python interpreter with a
/// configurable set of installed formatting modules.
#[derive(Clone)]
pub struct TestEnvironment {
  vars: Arc<Mutex<HashMap<String, String>>>,
  executables: Arc<Mutex<HashMap<String, PathBuf>>>,
  python_modules: Arc<Mutex<HashMap<String, FakeFormatFn>>>,
  process_override: Arc<Mutex<Option<ProcessOverrideFn>>>,
  process_runs: Arc<Mutex<Vec<ProcessCommand>>>,
  stderr_messages: Arc<Mutex<Vec<String>>>,
  log_level: Arc<Mutex<LogLevel>>,
}

impl TestEnvironment {
  pub fn new() -> TestEnvironment {
    TestEnvironment {
      vars: Default::default(),
      executables: Default::default(),
      python_modules: Default::default(),
      process_override: Default::default(),
      process_runs: Default::default(),
      stderr_messages: Default::default(),
      log_level: Arc::new(Mutex::new(LogLevel::Info)),
    }
  }

  pub fn set_var(&self, name: &str, value: &str) {
    self.vars.lock().insert(name.to_string(), value.to_string());
  }

  pub fn set_log_level(&self, log_level: LogLevel) {
    *self.log_level.lock() = log_level;
  }

  pub fn add_executable(&self, command_name: &str, path: &str) {
    self.executables.lock().insert(command_name.to_string(), PathBuf::from(path));
  }

  /// Installs a module the fake interpreter can import and format with.
  pub fn add_python_module(
    &self,
    module_name: &str,
    format: impl Fn(&str, &FormatOptions) -> Result<String, FakeException> + Send + Sync + 'static,
  ) {
    self.python_modules.lock().insert(module_name.to_string(), Arc::new(format));
  }

  /// Answers every process run with the provided output instead of the fake interpreter.
  pub fn set_process_override(&self, handler: impl Fn(&ProcessCommand) -> ProcessOutput + Send + Sync + 'static) {
    *self.process_override.lock() = Some(Arc::new(handler));
  }

  pub fn take_process_runs(&self) -> Vec<ProcessCommand> {
    std::mem::take(&mut *self.process_runs.lock())
  }

  pub fn take_stderr_messages(&self) -> Vec<String> {
    std::mem::take(&mut *self.stderr_messages.lock())
  }

  fn is_known_executable(&self, program: &Path) -> bool {
    self.executables.lock().values().any(|path| path == program)
  }

  fn run_fake_python(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
    let script = match command.args.as_slice() {
      [flag, script] if flag == "-c" => script,
      _ => bail!("Unsupported python arguments: {:?}", command.args),
    };

    if let Some(module_name) = script.strip_prefix("import ").filter(|name| !name.contains('\n')) {
      return Ok(if self.python_modules.lock().contains_key(module_name) {
        ProcessOutput {
          exit_code: Some(0),
          ..Default::default()
        }
      } else {
        ProcessOutput {
          exit_code: Some(1),
          stdout: Vec::new(),
          stderr: format!("ModuleNotFoundError: No module named '{}'", module_name).into_bytes(),
        }
      });
    }

    let request: Value = serde_json::from_slice(&command.stdin)?;
    let formatter_name = request["formatter"].as_str().unwrap_or_default();
    let Some(formatter) = Formatter::ALL.into_iter().find(|f| f.name() == formatter_name) else {
      bail!("Unknown formatter in request: {}", formatter_name);
    };
    let code = request["code"].as_str().unwrap_or_default();
    let options: FormatOptions = match &request["options"] {
      Value::Object(options) => options.clone(),
      _ => bail!("Expected options object."),
    };

    let format = self.python_modules.lock().get(formatter.module_name()).cloned();
    let response = match format {
      Some(format) => match format(code, &options) {
        Ok(text) => DriverResponse::Formatted { text },
        Err(err) => DriverResponse::Exception {
          exception_type: err.exception_type,
          message: err.message,
          traceback: "Traceback (most recent call last):\n  <fake>".to_string(),
        },
      },
      None => DriverResponse::Exception {
        exception_type: "ModuleNotFoundError".to_string(),
        message: format!("No module named '{}'", formatter.module_name()),
        traceback: "Traceback (most recent call last):\n  <fake>".to_string(),
      },
    };

    Ok(ProcessOutput {
      exit_code: Some(0),
      stdout: serde_json::to_vec(&response)?,
      stderr: Vec::new(),
    })
  }
}

impl Environment for TestEnvironment {
  fn var(&self, name: &str) -> Option<String> {
    self.vars.lock().get(name).cloned()
  }

  fn path_exists(&self, path: &Path) -> bool {
    self.is_known_executable(path)
  }

  fn which(&self, command_name: &str) -> Result<PathBuf> {
    match self.executables.lock().get(command_name) {
      Some(path) => Ok(path.clone()),
      None => bail!("Could not find executable '{}' on the path.", command_name),
    }
  }

  fn run_process(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
    self.process_runs.lock().push(command.clone());
    let process_override = self.process_override.lock().clone();
    if let Some(handler) = process_override {
      return Ok(handler(command));
    }
    if !self.is_known_executable(&command.program) {
      bail!("Failed to start {}", command.program.display());
    }
    self.run_fake_python(command)
  }

  fn log_level(&self) -> LogLevel {
    *self.log_level.lock()
  }

  fn log_stderr(&self, text: &str) {
    self.stderr_messages.lock().push(text.to_string());
  }

  fn log_stderr_with_context(&self, text: &str, context_name: &str) {
    self.stderr_messages.lock().push(format!("[{}] {}", context_name, text));
  }
}
