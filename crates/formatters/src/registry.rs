use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::FormatOptions;
use crate::Formatter;
use crate::environment::Environment;
use crate::error::FormatError;
use crate::error::FormatterNotFoundError;

/// The formatters that can be run, keyed by identifier.
pub static SERVER_FORMATTERS: Lazy<IndexMap<&'static str, Formatter>> =
  Lazy::new(|| Formatter::ALL.into_iter().map(|formatter| (formatter.name(), formatter)).collect());

/// Gets the formatter registered under the identifier.
pub fn get_formatter(name: &str) -> Result<Formatter, FormatterNotFoundError> {
  SERVER_FORMATTERS
    .get(name)
    .copied()
    .ok_or_else(|| FormatterNotFoundError { name: name.to_string() })
}

/// Registered identifiers in registration order.
pub fn formatter_names() -> impl Iterator<Item = &'static str> {
  SERVER_FORMATTERS.keys().copied()
}

/// Formats the code with the formatter registered under the identifier.
pub fn format(environment: &impl Environment, name: &str, code: &str, options: &FormatOptions) -> Result<String, FormatError> {
  let formatter = get_formatter(name)?;
  formatter.format_code(environment, code, options)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FormatterInfo {
  pub enabled: bool,
  pub label: &'static str,
}

/// Describes every registered formatter along with whether it can be used.
pub fn list_formatters(environment: &impl Environment) -> IndexMap<String, FormatterInfo> {
  SERVER_FORMATTERS
    .iter()
    .map(|(name, formatter)| {
      let info = FormatterInfo {
        enabled: formatter.importable(environment),
        label: formatter.label(),
      };
      (name.to_string(), info)
    })
    .collect()
}
