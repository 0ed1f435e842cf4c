//! Permission checks delegated to the backing entity.

use std::collections::HashSet;
use std::sync::Weak;

use wedit_config::CommandBlockConfig;

use crate::error::AuthorizationError;
use crate::host::CommandBlockEntity;

/// Permission node that lets an actor break bedrock.
pub const OVERRIDE_BEDROCK: &str = "worldedit.override.bedrock";

/// Read-only view of a backing entity's permissions.
///
/// Grants are fixed by the entity and server configuration, so toggling and
/// setting succeed without changing anything.
pub struct PermissionGateway {
	sender: Weak<dyn CommandBlockEntity>,
}

impl PermissionGateway {
	pub fn new(sender: Weak<dyn CommandBlockEntity>) -> Self {
		Self { sender }
	}

	/// Asks the backing entity. An entity that no longer exists holds no permissions.
	pub fn has_permission(&self, permission: &str) -> bool {
		self.sender.upgrade().is_some_and(|sender| sender.has_permission(permission))
	}

	pub fn check_permission(&self, permission: &str) -> Result<(), AuthorizationError> {
		if self.has_permission(permission) {
			Ok(())
		} else {
			tracing::debug!(permission, "permission.denied");
			Err(AuthorizationError::new(permission))
		}
	}

	/// Reports success without changing any grant.
	pub fn toggle_permission(&self, permission: &str) -> bool {
		tracing::trace!(permission, "permission.toggle_ignored");
		true
	}

	pub fn set_permission(&self, permission: &str, value: bool) {
		tracing::trace!(permission, value, "permission.set_ignored");
	}
}

/// Immutable set of granted permission nodes.
///
/// A grant ending in `.*` covers the node before it and everything below it;
/// a lone `*` covers everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTable {
	exact: HashSet<String>,
	subtrees: Vec<String>,
	everything: bool,
}

impl PermissionTable {
	pub fn new<I, S>(grants: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut table = Self::default();
		for grant in grants {
			let grant = grant.into();
			if grant == "*" {
				table.everything = true;
			} else if let Some(root) = grant.strip_suffix(".*") {
				table.subtrees.push(root.to_string());
			} else {
				table.exact.insert(grant);
			}
		}
		table
	}

	/// Table holding the grants configured for command blocks.
	///
	/// Hosts build each entity's permission store from this; the gateway
	/// itself only ever asks the entity.
	pub fn from_config(config: &CommandBlockConfig) -> Self {
		Self::new(config.grants.iter().map(String::as_str))
	}

	pub fn contains(&self, permission: &str) -> bool {
		self.everything
			|| self.exact.contains(permission)
			|| self.subtrees.iter().any(|root| {
				permission == root || permission.strip_prefix(root.as_str()).is_some_and(|rest| rest.starts_with('.'))
			})
	}
}
