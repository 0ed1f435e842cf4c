//! The actor surface the editing framework programs against, and the host
//! services an actor is built from.

use std::sync::Arc;

use wedit_text::{Component, Formatter, Locale};
use wedit_worker::Dispatch;

use crate::error::AuthorizationError;
use crate::identity::Identity;
use crate::location::{DirectLocationAdapter, Extent, Location, LocationAdapter};
use crate::permission::OVERRIDE_BEDROCK;

/// Handle the session manager keys per-actor state by.
pub trait SessionKey: Send + Sync {
	/// Display name of the session owner.
	fn name(&self) -> String;

	fn unique_id(&self) -> Identity;

	/// Whether the session owner can still issue commands.
	fn is_active(&self) -> bool;

	/// Persistent sessions are exempt from idle expiry.
	fn is_persistent(&self) -> bool;
}

/// A principal that can run commands, player or not.
pub trait Actor: Send + Sync {
	fn name(&self) -> String;

	fn unique_id(&self) -> Identity;

	/// Permission groups the actor belongs to.
	fn groups(&self) -> Vec<String>;

	/// Locale structured messages are rendered in.
	fn locale(&self) -> Locale;

	fn is_player(&self) -> bool;

	/// Sends text without styling.
	fn print_raw(&self, message: &str);

	/// Sends an informational message.
	fn print(&self, message: &str);

	fn print_debug(&self, message: &str);

	fn print_error(&self, message: &str);

	/// Sends a structured message.
	fn print_component(&self, component: &Component);

	fn has_permission(&self, permission: &str) -> bool;

	/// Fails with [`AuthorizationError`] when the actor lacks `permission`.
	fn check_permission(&self, permission: &str) -> Result<(), AuthorizationError> {
		if self.has_permission(permission) {
			Ok(())
		} else {
			Err(AuthorizationError::new(permission))
		}
	}

	/// Flips a session-scoped grant, returning whether it is now enabled.
	fn toggle_permission(&self, permission: &str) -> bool;

	fn set_permission(&self, permission: &str, value: bool);

	fn can_destroy_bedrock(&self) -> bool {
		self.has_permission(OVERRIDE_BEDROCK)
	}

	fn session_key(&self) -> Arc<dyn SessionKey>;
}

/// An actor with a place in the world.
pub trait Locatable {
	fn location(&self) -> Location;

	/// Moves the actor. Returns whether it moved.
	fn set_location(&self, location: Location) -> bool;

	fn extent(&self) -> Arc<dyn Extent>;
}

/// Host services shared by every actor a platform creates.
#[derive(Clone)]
pub struct PlatformContext {
	name: Arc<str>,
	dispatch: Arc<dyn Dispatch>,
	formatter: Arc<dyn Formatter>,
	locations: Arc<dyn LocationAdapter>,
}

impl PlatformContext {
	/// Creates a context that exposes host levels directly as extents.
	pub fn new(name: &str, dispatch: Arc<dyn Dispatch>, formatter: Arc<dyn Formatter>) -> Self {
		Self {
			name: Arc::from(name),
			dispatch,
			formatter,
			locations: Arc::new(DirectLocationAdapter),
		}
	}

	pub fn with_location_adapter(mut self, locations: Arc<dyn LocationAdapter>) -> Self {
		self.locations = locations;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn dispatch(&self) -> &Arc<dyn Dispatch> {
		&self.dispatch
	}

	pub fn formatter(&self) -> &Arc<dyn Formatter> {
		&self.formatter
	}

	pub fn locations(&self) -> &Arc<dyn LocationAdapter> {
		&self.locations
	}
}

impl std::fmt::Debug for PlatformContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PlatformContext").field("name", &self.name).finish_non_exhaustive()
	}
}
