use std::path::PathBuf;

use anyhow::Result;
use anyhow::anyhow;

use crate::environment::Environment;

pub const PYTHON_PATH_ENV_VAR_NAME: &str = "CODE_FORMATTERS_PYTHON_PATH";

/// Executable names searched on the path, in order.
const PYTHON_EXECUTABLE_NAMES: [&str; 2] = ["python3", "python"];

/// Finds the Python interpreter that hosts the formatting libraries.
///
/// An explicit path in the `CODE_FORMATTERS_PYTHON_PATH` environment variable wins,
/// then `python3` and `python` are looked up on the path.
pub fn resolve_python_executable(environment: &impl Environment) -> Result<PathBuf> {
  if let Some(path) = environment.var(PYTHON_PATH_ENV_VAR_NAME) {
    let path = path.trim();
    if !path.is_empty() {
      let path = PathBuf::from(path);
      if environment.path_exists(&path) {
        return Ok(path);
      }
      return Err(python_not_found_error(format!(
        "The {} environment variable points to a path that does not exist: {}",
        PYTHON_PATH_ENV_VAR_NAME,
        path.display()
      )));
    }
  }

  let mut last_error = None;
  for name in PYTHON_EXECUTABLE_NAMES {
    match environment.which(name) {
      Ok(path) => {
        log_debug!(environment, "Resolved Python interpreter: {}", path.display());
        return Ok(path);
      }
      Err(err) => last_error = Some(err),
    }
  }

  Err(python_not_found_error(last_error.map(|err| format!("{:#}", err)).unwrap_or_default()))
}

fn python_not_found_error(reason: String) -> anyhow::Error {
  anyhow!(
    concat!(
      "A Python interpreter is required to run the formatters. Please ensure 'python3' or 'python' ",
      "is installed and available on the path. Alternatively, you may supply a {} ",
      "environment variable.\n\n{}"
    ),
    PYTHON_PATH_ENV_VAR_NAME,
    reason,
  )
}
