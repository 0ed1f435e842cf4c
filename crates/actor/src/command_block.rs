//! Command blocks as framework actors.

use std::sync::{Arc, Weak};

use wedit_text::{Component, Locale};

use crate::error::{ActorError, AuthorizationError};
use crate::host::CommandBlockEntity;
use crate::identity::{COMMAND_BLOCK_PREFIX, Identity};
use crate::liveness::BlockSessionKey;
use crate::location::{Extent, Location};
use crate::messenger::{Severity, ThreadAffineMessenger};
use crate::permission::PermissionGateway;
use crate::platform::{Actor, Locatable, PlatformContext, SessionKey};

/// Actor backed by a command-block entity.
///
/// Identity and location are fixed when the actor is created; the name is
/// read from the block every time. The actor only holds a lookup reference to
/// the block and is meant to live for one command.
pub struct CommandBlockActor {
	sender: Weak<dyn CommandBlockEntity>,
	name_at_creation: String,
	identity: Identity,
	location: Location,
	messenger: ThreadAffineMessenger,
	permissions: PermissionGateway,
	session: Arc<BlockSessionKey>,
}

impl CommandBlockActor {
	pub fn new<E>(platform: &PlatformContext, sender: &Arc<E>) -> Self
	where
		E: CommandBlockEntity + 'static,
	{
		let weak: Weak<dyn CommandBlockEntity> = Arc::downgrade(sender) as Weak<dyn CommandBlockEntity>;
		Self::build(platform, weak, sender.as_ref())
	}

	/// Creates an actor from a lookup reference, failing if the block is gone.
	pub fn from_weak(platform: &PlatformContext, sender: Weak<dyn CommandBlockEntity>) -> Result<Self, ActorError> {
		let strong = sender.upgrade().ok_or(ActorError::SenderUnavailable)?;
		Ok(Self::build(platform, sender, strong.as_ref()))
	}

	fn build(platform: &PlatformContext, weak: Weak<dyn CommandBlockEntity>, sender: &dyn CommandBlockEntity) -> Self {
		let name = sender.name();
		let identity = Identity::derive(COMMAND_BLOCK_PREFIX, &name);
		let location = platform.locations().adapt(&sender.location());
		tracing::debug!(platform = platform.name(), name = name.as_str(), %identity, extent = location.extent().name(), "command_block_actor.created");

		Self {
			messenger: ThreadAffineMessenger::new(weak.clone(), Arc::clone(platform.dispatch()), Arc::clone(platform.formatter())),
			permissions: PermissionGateway::new(weak.clone()),
			session: Arc::new(BlockSessionKey::new(identity, &name, weak.clone(), Arc::clone(platform.dispatch()))),
			sender: weak,
			name_at_creation: name,
			identity,
			location,
		}
	}

	/// The backing block entity, if it still exists.
	pub fn sender(&self) -> Option<Arc<dyn CommandBlockEntity>> {
		self.sender.upgrade()
	}

	/// Concrete session key, for callers that want its cached state.
	pub fn block_session_key(&self) -> &Arc<BlockSessionKey> {
		&self.session
	}
}

impl Actor for CommandBlockActor {
	fn name(&self) -> String {
		self.sender.upgrade().map_or_else(|| self.name_at_creation.clone(), |sender| sender.name())
	}

	fn unique_id(&self) -> Identity {
		self.identity
	}

	fn groups(&self) -> Vec<String> {
		Vec::new()
	}

	fn locale(&self) -> Locale {
		wedit_config::current().default_locale.clone()
	}

	fn is_player(&self) -> bool {
		false
	}

	fn print_raw(&self, message: &str) {
		self.messenger.send_legacy(Severity::Raw, message, self.locale());
	}

	fn print(&self, message: &str) {
		self.messenger.send_legacy(Severity::Info, message, self.locale());
	}

	fn print_debug(&self, message: &str) {
		self.messenger.send_legacy(Severity::Debug, message, self.locale());
	}

	fn print_error(&self, message: &str) {
		self.messenger.send_legacy(Severity::Error, message, self.locale());
	}

	fn print_component(&self, component: &Component) {
		let config = wedit_config::current();
		self.messenger.send_structured(component, &config.default_locale, config.structured_dispatch);
	}

	fn has_permission(&self, permission: &str) -> bool {
		self.permissions.has_permission(permission)
	}

	fn check_permission(&self, permission: &str) -> Result<(), AuthorizationError> {
		self.permissions.check_permission(permission)
	}

	fn toggle_permission(&self, permission: &str) -> bool {
		self.permissions.toggle_permission(permission)
	}

	fn set_permission(&self, permission: &str, value: bool) {
		self.permissions.set_permission(permission, value);
	}

	fn session_key(&self) -> Arc<dyn SessionKey> {
		Arc::clone(&self.session) as Arc<dyn SessionKey>
	}
}

impl Locatable for CommandBlockActor {
	fn location(&self) -> Location {
		self.location.clone()
	}

	/// Command blocks cannot be moved.
	fn set_location(&self, _location: Location) -> bool {
		tracing::trace!(identity = %self.identity, "command_block_actor.set_location_rejected");
		false
	}

	fn extent(&self) -> Arc<dyn Extent> {
		Arc::clone(self.location.extent())
	}
}

impl std::fmt::Debug for CommandBlockActor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommandBlockActor")
			.field("identity", &self.identity)
			.field("name_at_creation", &self.name_at_creation)
			.field("location", &self.location)
			.finish_non_exhaustive()
	}
}
