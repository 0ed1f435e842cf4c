//! Configuration system for wedit.
//!
//! Configuration is written in KDL (v2) and describes how non-player actors
//! talk to the world:
//!
//! ```kdl
//! // Locale used to render structured messages.
//! locale "en_US"
//!
//! messages {
//!     // "direct" sends structured messages on the calling thread,
//!     // "sync" marshals them onto the authoritative thread.
//!     structured-dispatch "direct"
//! }
//!
//! // Permissions granted to command blocks.
//! command-block {
//!     grant "worldedit.*"
//!     grant "worldedit.override.bedrock"
//! }
//! ```
//!
//! One [`Configuration`] is installed process-wide with [`install`] and read
//! with [`current`]; readers always see a complete snapshot.

pub mod error;

use std::path::Path;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
pub use error::{ConfigError, ConfigWarning, Result};
use kdl::{KdlDocument, KdlNode};
use wedit_text::Locale;

/// Threading policy for structured (component) messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructuredDispatch {
	/// Send on the calling thread without marshaling.
	#[default]
	Direct,
	/// Marshal onto the authoritative thread and wait, like legacy messages.
	Sync,
}

impl StructuredDispatch {
	fn parse(value: &str) -> Result<Self> {
		match value {
			"direct" => Ok(Self::Direct),
			"sync" => Ok(Self::Sync),
			other => Err(ConfigError::InvalidDispatch(other.to_string())),
		}
	}
}

/// Settings applied to command-block senders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBlockConfig {
	/// Permission nodes granted to every command block. `*` suffixes match subtrees.
	pub grants: Vec<String>,
}

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
	/// Locale for actors that have no locale of their own.
	pub default_locale: Locale,
	/// Threading policy for structured messages.
	pub structured_dispatch: StructuredDispatch,
	/// Command-block settings.
	pub command_block: CommandBlockConfig,
	/// Non-fatal warnings encountered during parsing.
	pub warnings: Vec<ConfigWarning>,
}

impl Configuration {
	/// Parse a KDL string into a [`Configuration`].
	///
	/// Missing nodes keep their defaults. Unknown top-level nodes are reported
	/// in [`Configuration::warnings`].
	pub fn parse(input: &str) -> Result<Self> {
		let doc: KdlDocument = input.parse()?;
		let mut config = Configuration::default();

		for node in doc.nodes() {
			match node.name().value() {
				"locale" => {
					config.default_locale = first_string(node, "locale")?.parse()?;
				}
				"messages" => {
					if let Some(value) = node.children().and_then(|c| c.get("structured-dispatch")) {
						config.structured_dispatch = StructuredDispatch::parse(first_string(value, "messages.structured-dispatch")?)?;
					}
				}
				"command-block" => {
					config.command_block = parse_command_block(node)?;
				}
				other => config.warnings.push(ConfigWarning::UnknownNode(other.to_string())),
			}
		}

		for warning in &config.warnings {
			tracing::warn!(%warning, "config.warning");
		}
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}
}

fn first_string<'a>(node: &'a KdlNode, field: &str) -> Result<&'a str> {
	node.entries()
		.iter()
		.find(|e| e.name().is_none())
		.and_then(|e| e.value().as_string())
		.ok_or_else(|| ConfigError::ExpectedString(field.to_string()))
}

fn parse_command_block(node: &KdlNode) -> Result<CommandBlockConfig> {
	let mut grants = Vec::new();
	let Some(children) = node.children() else {
		return Ok(CommandBlockConfig { grants });
	};
	for grant in children.nodes().iter().filter(|n| n.name().value() == "grant") {
		for entry in grant.entries().iter().filter(|e| e.name().is_none()) {
			let value = entry
				.value()
				.as_string()
				.ok_or_else(|| ConfigError::ExpectedString("command-block.grant".to_string()))?;
			grants.push(value.to_string());
		}
	}
	Ok(CommandBlockConfig { grants })
}

static CURRENT: LazyLock<ArcSwap<Configuration>> = LazyLock::new(|| ArcSwap::from_pointee(Configuration::default()));

/// Returns the process-wide configuration snapshot.
pub fn current() -> Arc<Configuration> {
	CURRENT.load_full()
}

/// Replaces the process-wide configuration, returning the previous snapshot.
pub fn install(config: Configuration) -> Arc<Configuration> {
	tracing::debug!(locale = %config.default_locale, dispatch = ?config.structured_dispatch, "config.install");
	CURRENT.swap(Arc::new(config))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serial_test::serial;

	use super::*;

	const FULL: &str = r#"
locale "de-de"
messages {
    structured-dispatch "sync"
}
command-block {
    grant "worldedit.*" "worldedit.override.bedrock"
    grant "worldguard.region.info"
}
"#;

	#[test]
	fn parses_full_document() {
		let config = Configuration::parse(FULL).unwrap();
		assert_eq!(config.default_locale.as_str(), "de_DE");
		assert_eq!(config.structured_dispatch, StructuredDispatch::Sync);
		assert_eq!(
			config.command_block.grants,
			vec!["worldedit.*", "worldedit.override.bedrock", "worldguard.region.info"]
		);
		assert!(config.warnings.is_empty());
	}

	#[test]
	fn empty_document_keeps_defaults() {
		let config = Configuration::parse("").unwrap();
		assert_eq!(config, Configuration::default());
		assert_eq!(config.default_locale, Locale::en_us());
		assert_eq!(config.structured_dispatch, StructuredDispatch::Direct);
	}

	#[test]
	fn unknown_nodes_warn() {
		let config = Configuration::parse("colour \"red\"\nlocale \"fr\"").unwrap();
		assert_eq!(config.default_locale.as_str(), "fr");
		assert_eq!(config.warnings, vec![ConfigWarning::UnknownNode("colour".into())]);
	}

	#[test]
	fn rejects_unknown_dispatch_policy() {
		let err = Configuration::parse("messages { structured-dispatch \"eventually\"; }").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidDispatch(ref p) if p == "eventually"), "{err}");
	}

	#[test]
	fn rejects_bad_locale_and_non_string() {
		assert!(matches!(Configuration::parse("locale \"nope_nope\"").unwrap_err(), ConfigError::InvalidLocale(_)));
		assert!(matches!(Configuration::parse("locale 12").unwrap_err(), ConfigError::ExpectedString(_)));
	}

	#[test]
	fn rejects_malformed_kdl() {
		assert!(matches!(Configuration::parse("messages {").unwrap_err(), ConfigError::Kdl(_)));
	}

	#[test]
	fn load_reads_file_and_reports_missing_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("wedit.kdl");
		std::fs::write(&path, FULL).unwrap();
		assert_eq!(Configuration::load(&path).unwrap().structured_dispatch, StructuredDispatch::Sync);

		let missing = dir.path().join("missing.kdl");
		assert!(matches!(Configuration::load(&missing).unwrap_err(), ConfigError::Io { .. }));
	}

	#[test]
	#[serial(wedit_config)]
	fn install_swaps_process_snapshot() {
		let custom = Configuration::parse("locale \"ja_JP\"").unwrap();
		let previous = install(custom);
		assert_eq!(current().default_locale.as_str(), "ja_JP");
		install((*previous).clone());
		assert_eq!(current().default_locale, previous.default_locale);
	}
}
