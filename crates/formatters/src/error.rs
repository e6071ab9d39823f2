use thiserror::Error;

/// The formatter identifier is not in the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Formatter '{name}' was not found.")]
pub struct FormatterNotFoundError {
  pub name: String,
}

/// An exception raised by the backing formatting library.
///
/// The exception is kept as the library reported it. Callers interpret it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{exception_type}: {message}")]
pub struct BackendError {
  /// Identifier of the formatter that raised.
  pub formatter: String,
  /// Python exception class name. Ex. `TypeError`.
  pub exception_type: String,
  pub message: String,
  pub traceback: String,
}

#[derive(Debug, Error)]
pub enum FormatError {
  #[error(transparent)]
  NotFound(#[from] FormatterNotFoundError),
  #[error(transparent)]
  Backend(#[from] BackendError),
  #[error("{0:#}")]
  PythonNotFound(anyhow::Error),
  #[error("{0:#}")]
  Process(anyhow::Error),
}

impl FormatError {
  /// Gets the library's exception when the backing library raised.
  pub fn as_backend_error(&self) -> Option<&BackendError> {
    match self {
      FormatError::Backend(err) => Some(err),
      _ => None,
    }
  }
}
