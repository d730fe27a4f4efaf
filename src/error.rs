//! Errors raised while constructing the plugin from user options.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected before any build asset is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// `redirects` was supplied but is not an ordered sequence.
  #[error("redirects should be an array, but was of type '{found}'")]
  RedirectsNotSequence {
    /// JSON type name of the offending value.
    found: &'static str,
  },

  /// The options value could not be read as plugin options.
  #[error("invalid plugin options: {0}")]
  InvalidOptions(String),

  /// An explicitly requested configuration file could not be read.
  #[error("failed to read {}", .path.display())]
  Read {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },

  /// An amended configuration file could not be written back.
  #[error("failed to write {}", .path.display())]
  Write {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },

  /// A configuration file was read but could not be parsed.
  #[error("failed to parse {}: {message}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Parser message.
    message: String,
  },
}

/// Name of a JSON value's type as reported in configuration errors.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
  use serde_json::Value;

  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
