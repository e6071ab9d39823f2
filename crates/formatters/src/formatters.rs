use anyhow::Context;
use anyhow::anyhow;

use crate::FormatOptions;
use crate::environment::Environment;
use crate::environment::ProcessCommand;
use crate::error::BackendError;
use crate::error::FormatError;
use crate::python::DriverRequest;
use crate::python::DriverResponse;
use crate::python::build_driver_script;
use crate::python::build_import_probe_script;
use crate::python::resolve_python_executable;

/// A formatter backed by an external Python formatting library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatter {
  Black,
  Autopep8,
  Yapf,
}

impl Formatter {
  pub const ALL: [Formatter; 3] = [Formatter::Black, Formatter::Autopep8, Formatter::Yapf];

  /// The registry identifier.
  pub fn name(&self) -> &'static str {
    match self {
      Formatter::Black => "black",
      Formatter::Autopep8 => "autopep8",
      Formatter::Yapf => "yapf",
    }
  }

  /// Text to display in a UI.
  pub fn label(&self) -> &'static str {
    match self {
      Formatter::Black => "Apply Black Formatter",
      Formatter::Autopep8 => "Apply Autopep8 Formatter",
      Formatter::Yapf => "Apply YAPF Formatter",
    }
  }

  /// The Python module holding the library's formatting entry point.
  fn import_path(&self) -> &'static str {
    match self {
      Formatter::Black => "black",
      Formatter::Autopep8 => "autopep8",
      Formatter::Yapf => "yapf.yapflib.yapf_api",
    }
  }

  /// The top level package of the backing library. This is what the availability check imports.
  pub fn module_name(&self) -> &'static str {
    let import_path = self.import_path();
    import_path.split('.').next().unwrap_or(import_path)
  }

  /// Python expression calling the library with `code` and `options`.
  /// It is evaluated after `import_path` has been imported.
  fn format_expression(&self) -> &'static str {
    match self {
      // format_str only accepts a Mode, so the options configure it
      Formatter::Black => "black.format_str(code, mode=black.Mode(**options))",
      Formatter::Autopep8 => "autopep8.fix_code(code, **options)",
      Formatter::Yapf => "yapf.yapflib.yapf_api.FormatCode(code, **options)[0]",
    }
  }

  fn format_call(&self) -> String {
    format!("import {}\ntext = {}", self.import_path(), self.format_expression())
  }

  /// Checks the backing library can be imported.
  ///
  /// Never errors. Any failure to resolve the library is reported as `false`.
  pub fn importable(&self, environment: &impl Environment) -> bool {
    let python_path = match resolve_python_executable(environment) {
      Ok(path) => path,
      Err(err) => {
        log_debug!(environment, "{} is not importable. {:#}", self.module_name(), err);
        return false;
      }
    };
    let command = ProcessCommand::new(python_path)
      .arg("-c")
      .arg(build_import_probe_script(self.module_name()));
    match environment.run_process(&command) {
      Ok(output) if output.success() => true,
      Ok(output) => {
        log_debug!(
          environment,
          "{} is not importable. {}",
          self.module_name(),
          String::from_utf8_lossy(&output.stderr).trim()
        );
        false
      }
      Err(err) => {
        log_debug!(environment, "{} is not importable. {:#}", self.module_name(), err);
        false
      }
    }
  }

  /// Formats the code with the backing library, passing `options` through as keyword arguments.
  ///
  /// Callers should check [`Formatter::importable`] first. When the library is missing the
  /// resulting `ModuleNotFoundError` is returned like any other library exception.
  pub fn format_code(&self, environment: &impl Environment, code: &str, options: &FormatOptions) -> Result<String, FormatError> {
    let python_path = resolve_python_executable(environment).map_err(FormatError::PythonNotFound)?;
    let request = DriverRequest {
      formatter: self.name(),
      code,
      options,
    };
    let request_bytes = serde_json::to_vec(&request)
      .context("Failed serializing format request.")
      .map_err(FormatError::Process)?;
    let command = ProcessCommand::new(python_path)
      .arg("-c")
      .arg(build_driver_script(&self.format_call()))
      .env("PYTHONIOENCODING", "utf-8")
      .stdin(request_bytes);

    log_debug!(environment, "Formatting {} bytes with {}", code.len(), self.name());
    let output = environment
      .run_process(&command)
      .with_context(|| format!("Error running {} formatter.", self.name()))
      .map_err(FormatError::Process)?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() && environment.log_level().is_warn() {
      environment.log_stderr_with_context(stderr, self.name());
    }

    match serde_json::from_slice::<DriverResponse>(&output.stdout) {
      Ok(DriverResponse::Formatted { text }) => Ok(text),
      Ok(DriverResponse::Exception {
        exception_type,
        message,
        traceback,
      }) => Err(FormatError::Backend(BackendError {
        formatter: self.name().to_string(),
        exception_type,
        message,
        traceback,
      })),
      Err(err) => Err(FormatError::Process(
        anyhow!(
          "Exit code: {}\nStderr: {}",
          output.exit_code.map(|code| code.to_string()).unwrap_or_else(|| "none".to_string()),
          stderr,
        )
        .context(format!("Invalid response from {} formatter. {}", self.name(), err)),
      )),
    }
  }
}

impl std::fmt::Display for Formatter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}
