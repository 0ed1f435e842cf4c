//! Stable identities for senders that have none of their own.

use std::fmt;

use md5::{Digest, Md5};
use uuid::{Builder, Uuid};

/// Prefix namespacing command-block identities away from other non-player actors.
pub const COMMAND_BLOCK_PREFIX: &str = "CMD";

/// 128-bit actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Uuid);

impl Identity {
	/// Derives the identity for `name` under `prefix`.
	///
	/// Name-based (version 3) UUID: the MD5 digest of the UTF-8 bytes of
	/// `prefix` followed by `name`, with no namespace, so identities match
	/// those already stored by existing servers.
	pub fn derive(prefix: &str, name: &str) -> Self {
		let mut hasher = Md5::new();
		hasher.update(prefix.as_bytes());
		hasher.update(name.as_bytes());
		let mut bytes = [0u8; 16];
		bytes.copy_from_slice(&hasher.finalize());
		Self(Builder::from_md5_bytes(bytes).into_uuid())
	}

	pub const fn as_uuid(&self) -> &Uuid {
		&self.0
	}

	pub const fn as_u128(&self) -> u128 {
		self.0.as_u128()
	}
}

impl From<Identity> for Uuid {
	fn from(identity: Identity) -> Self {
		identity.0
	}
}

impl fmt::Display for Identity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}
