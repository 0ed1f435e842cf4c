use thiserror::Error;

/// Raised when an actor lacks a permission it was checked for.
///
/// The command layer aborts the privileged operation on this error and
/// reports it to whoever issued the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("you are not permitted to do that (missing {permission})")]
pub struct AuthorizationError {
	permission: String,
}

impl AuthorizationError {
	pub fn new(permission: impl Into<String>) -> Self {
		Self {
			permission: permission.into(),
		}
	}

	/// The permission node that was denied.
	pub fn permission(&self) -> &str {
		&self.permission
	}
}

/// Errors constructing an actor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
	/// The backing block entity no longer exists.
	#[error("command block sender is no longer available")]
	SenderUnavailable,
}
