//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing KDL syntax.
	#[error("KDL parse error: {0}")]
	Kdl(#[from] kdl::KdlError),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A field that must hold a string held something else.
	#[error("expected a string for {0}")]
	ExpectedString(String),

	/// The configured locale tag is malformed.
	#[error(transparent)]
	InvalidLocale(#[from] wedit_text::LocaleError),

	/// A structured-dispatch policy other than `direct` or `sync`.
	#[error("invalid structured-dispatch policy: {0} (expected 'direct' or 'sync')")]
	InvalidDispatch(String),
}

/// Non-fatal issue found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// A node the schema does not know about; it is ignored.
	UnknownNode(String),
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::UnknownNode(name) => write!(f, "unknown configuration node '{name}' will be ignored"),
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
