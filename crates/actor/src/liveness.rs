//! Session liveness for command-block actors.
//!
//! Whether a command block is still a valid sender can only be answered
//! accurately on the authoritative thread. [`LivenessTracker`] caches the last
//! answer in an atomic flag: the authoritative thread recomputes it on every
//! read, other threads read the cached flag and queue a recompute, so they
//! converge on the truth without ever blocking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use wedit_worker::Dispatch;

use crate::host::CommandBlockEntity;
use crate::identity::Identity;
use crate::platform::SessionKey;

/// Liveness state of a backing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Liveness {
	Active,
	Inactive,
}

impl Liveness {
	pub const fn is_active(self) -> bool {
		matches!(self, Self::Active)
	}

	const fn from_flag(active: bool) -> Self {
		if active { Self::Active } else { Self::Inactive }
	}
}

/// Lazily recomputed liveness flag.
///
/// Starts [`Liveness::Active`]. Only [`Self::recompute`] writes the flag.
/// At most one off-thread recompute is queued at a time.
pub struct LivenessTracker {
	active: AtomicBool,
	recompute_queued: AtomicBool,
	sender: Weak<dyn CommandBlockEntity>,
}

impl LivenessTracker {
	pub fn new(sender: Weak<dyn CommandBlockEntity>) -> Self {
		Self {
			active: AtomicBool::new(true),
			recompute_queued: AtomicBool::new(false),
			sender,
		}
	}

	/// Last computed state, without recomputing.
	pub fn cached(&self) -> Liveness {
		Liveness::from_flag(self.active.load(Ordering::Acquire))
	}

	/// Re-derives the state from the world and stores it.
	///
	/// Must run on the authoritative thread; world queries elsewhere are not
	/// reliable.
	pub fn recompute(&self) -> Liveness {
		self.recompute_queued.store(false, Ordering::Release);
		let next = match self.sender.upgrade() {
			Some(sender) => probe(sender.as_ref()),
			None => Liveness::Inactive,
		};
		let previous = Liveness::from_flag(self.active.swap(next.is_active(), Ordering::AcqRel));
		if previous != next {
			tracing::debug!(from = ?previous, to = ?next, "liveness.transition");
		}
		next
	}

	/// Answers "is the sender still valid".
	///
	/// Fresh on the authoritative thread. Anywhere else this returns the cached
	/// state and schedules a recompute, so a change may only become visible on
	/// a later call.
	pub fn is_active(self: &Arc<Self>, dispatch: &dyn Dispatch) -> bool {
		if dispatch.is_authoritative() {
			return self.recompute().is_active();
		}

		let cached = self.cached();
		if !self.recompute_queued.swap(true, Ordering::AcqRel) {
			let tracker = Arc::clone(self);
			dispatch.run_async(Box::new(move || {
				tracker.recompute();
			}));
		}
		cached.is_active()
	}
}

fn probe(sender: &dyn CommandBlockEntity) -> Liveness {
	let location = sender.location();
	let pos = location.block_pos();
	if !location.level.is_chunk_loaded(pos.chunk()) {
		return Liveness::Inactive;
	}
	Liveness::from_flag(location.level.block_kind_at(pos).is_command_block())
}

/// Session handle for a command-block actor.
///
/// Holds a lookup reference to the backing entity, never ownership, and may
/// outlive the actor it was created for. Clones share one liveness flag.
#[derive(Clone)]
pub struct BlockSessionKey {
	identity: Identity,
	fallback_name: Arc<str>,
	sender: Weak<dyn CommandBlockEntity>,
	tracker: Arc<LivenessTracker>,
	dispatch: Arc<dyn Dispatch>,
}

impl BlockSessionKey {
	pub fn new(identity: Identity, fallback_name: &str, sender: Weak<dyn CommandBlockEntity>, dispatch: Arc<dyn Dispatch>) -> Self {
		Self {
			identity,
			fallback_name: Arc::from(fallback_name),
			tracker: Arc::new(LivenessTracker::new(sender.clone())),
			sender,
			dispatch,
		}
	}

	/// Last computed state, without recomputing or scheduling.
	pub fn liveness(&self) -> Liveness {
		self.tracker.cached()
	}
}

impl SessionKey for BlockSessionKey {
	fn name(&self) -> String {
		self.sender.upgrade().map_or_else(|| self.fallback_name.to_string(), |sender| sender.name())
	}

	fn unique_id(&self) -> Identity {
		self.identity
	}

	fn is_active(&self) -> bool {
		self.tracker.is_active(&*self.dispatch)
	}

	/// Command-block sessions never expire from idleness.
	fn is_persistent(&self) -> bool {
		true
	}
}

impl std::fmt::Debug for BlockSessionKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BlockSessionKey")
			.field("identity", &self.identity)
			.field("liveness", &self.liveness())
			.finish_non_exhaustive()
	}
}
