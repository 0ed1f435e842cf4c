//! In-memory host world.
//!
//! A small [`Level`] and [`CommandBlockEntity`] pair for embedding tests and
//! tools that have no real server behind them. Every delivered line records
//! the thread it arrived on, so callers can check threading contracts.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};

use crate::host::{BlockKind, BlockPos, ChunkPos, CommandBlockEntity, CommandBlockMode, Level, NativeLocation};
use crate::permission::PermissionTable;

/// A level whose chunks and blocks are set by hand.
pub struct SimLevel {
	name: String,
	loaded: RwLock<HashSet<ChunkPos>>,
	blocks: RwLock<HashMap<BlockPos, BlockKind>>,
}

impl SimLevel {
	pub fn new(name: impl Into<String>) -> Arc<Self> {
		Arc::new(Self {
			name: name.into(),
			loaded: RwLock::new(HashSet::new()),
			blocks: RwLock::new(HashMap::new()),
		})
	}

	pub fn load_chunk(&self, chunk: ChunkPos) {
		self.loaded.write().insert(chunk);
	}

	pub fn unload_chunk(&self, chunk: ChunkPos) {
		self.loaded.write().remove(&chunk);
	}

	/// Places `kind` at `pos`. `Air` clears the position.
	pub fn set_block(&self, pos: BlockPos, kind: BlockKind) {
		let mut blocks = self.blocks.write();
		match kind {
			BlockKind::Air => blocks.remove(&pos),
			kind => blocks.insert(pos, kind),
		};
	}
}

impl Level for SimLevel {
	fn name(&self) -> &str {
		&self.name
	}

	fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
		self.loaded.read().contains(&chunk)
	}

	fn block_kind_at(&self, pos: BlockPos) -> BlockKind {
		self.blocks.read().get(&pos).cloned().unwrap_or(BlockKind::Air)
	}
}

/// One line received by a [`SimCommandBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
	pub message: String,
	pub thread: ThreadId,
}

/// Command-block entity living in a [`SimLevel`].
pub struct SimCommandBlock {
	name: RwLock<String>,
	level: Arc<SimLevel>,
	pos: BlockPos,
	permissions: PermissionTable,
	outbox: Mutex<Vec<Delivery>>,
}

impl SimCommandBlock {
	/// Places an impulse command block at `pos` and loads its chunk.
	pub fn place(level: &Arc<SimLevel>, pos: BlockPos, name: impl Into<String>, permissions: PermissionTable) -> Arc<Self> {
		level.set_block(pos, BlockKind::CommandBlock(CommandBlockMode::Impulse));
		level.load_chunk(pos.chunk());
		Arc::new(Self {
			name: RwLock::new(name.into()),
			level: Arc::clone(level),
			pos,
			permissions,
			outbox: Mutex::new(Vec::new()),
		})
	}

	/// Places an impulse command block holding the grants of the installed
	/// `command-block` configuration.
	pub fn place_configured(level: &Arc<SimLevel>, pos: BlockPos, name: impl Into<String>) -> Arc<Self> {
		let permissions = PermissionTable::from_config(&wedit_config::current().command_block);
		Self::place(level, pos, name, permissions)
	}

	pub fn rename(&self, name: impl Into<String>) {
		*self.name.write() = name.into();
	}

	pub fn pos(&self) -> BlockPos {
		self.pos
	}

	/// Received lines, oldest first.
	pub fn messages(&self) -> Vec<String> {
		self.outbox.lock().iter().map(|d| d.message.clone()).collect()
	}

	/// Received lines with the thread each arrived on.
	pub fn deliveries(&self) -> Vec<Delivery> {
		self.outbox.lock().clone()
	}
}

impl CommandBlockEntity for SimCommandBlock {
	fn name(&self) -> String {
		self.name.read().clone()
	}

	fn send_message(&self, message: &str) {
		self.outbox.lock().push(Delivery {
			message: message.to_string(),
			thread: thread::current().id(),
		});
	}

	fn has_permission(&self, permission: &str) -> bool {
		self.permissions.contains(permission)
	}

	fn location(&self) -> NativeLocation {
		let level: Arc<dyn Level> = Arc::clone(&self.level) as Arc<dyn Level>;
		NativeLocation::at_block(level, self.pos)
	}
}
