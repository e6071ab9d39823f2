//! Dispatches source text to one of several installed Python code formatters.
//!
//! ```no_run
//! use code_formatters::FormatOptions;
//! use code_formatters::RealEnvironment;
//!
//! let environment = RealEnvironment::from_env();
//! let formatter = code_formatters::get_formatter("black").unwrap();
//! if formatter.importable(&environment) {
//!   let text = formatter.format_code(&environment, "x=1", &FormatOptions::new()).unwrap();
//!   assert_eq!(text, "x = 1\n");
//! }
//! ```

#![deny(clippy::print_stdout)]

#[macro_use]
mod environment;

mod error;
mod formatters;
mod python;
mod registry;

pub use environment::Environment;
pub use environment::LogLevel;
pub use environment::ParseLogLevelError;
pub use environment::ProcessCommand;
pub use environment::ProcessOutput;
pub use environment::RealEnvironment;
pub use environment::RealEnvironmentOptions;
pub use environment::LOG_LEVEL_ENV_VAR_NAME;
pub use error::BackendError;
pub use error::FormatError;
pub use error::FormatterNotFoundError;
pub use formatters::Formatter;
pub use python::PYTHON_PATH_ENV_VAR_NAME;
pub use python::resolve_python_executable;
pub use registry::*;

/// Options forwarded verbatim to the backing library as keyword arguments.
pub type FormatOptions = serde_json::Map<String, serde_json::Value>;
