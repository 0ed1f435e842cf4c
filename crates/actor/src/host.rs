//! Capabilities the host simulation supplies for command-block actors.
//!
//! Nothing here is implemented by this crate outside of [`crate::sim`]; a
//! server embeds wedit by implementing [`Level`] and [`CommandBlockEntity`]
//! over its own world and block entities.

use std::fmt;
use std::sync::Arc;

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
	pub x: i32,
	pub y: i32,
	pub z: i32,
}

impl BlockPos {
	pub const fn new(x: i32, y: i32, z: i32) -> Self {
		Self { x, y, z }
	}

	/// Returns the 16x16 column containing this block.
	pub const fn chunk(self) -> ChunkPos {
		ChunkPos {
			x: self.x >> 4,
			z: self.z >> 4,
		}
	}
}

/// Chunk column coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
	pub x: i32,
	pub z: i32,
}

/// Execution mode of a command block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandBlockMode {
	Impulse,
	Chain,
	Repeating,
}

/// What currently occupies a block position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
	Air,
	CommandBlock(CommandBlockMode),
	/// Any other block, by identifier.
	Other(String),
}

impl BlockKind {
	/// True for every command-block mode.
	pub fn is_command_block(&self) -> bool {
		matches!(self, Self::CommandBlock(_))
	}
}

/// One simulated world.
///
/// Queries are only guaranteed to be accurate on the authoritative thread.
pub trait Level: Send + Sync {
	fn name(&self) -> &str;

	/// Whether the chunk is currently loaded and ticking.
	fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool;

	/// Block at `pos`.
	fn block_kind_at(&self, pos: BlockPos) -> BlockKind;
}

/// Position and orientation in the host's own representation.
#[derive(Clone)]
pub struct NativeLocation {
	pub level: Arc<dyn Level>,
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub yaw: f32,
	pub pitch: f32,
}

impl NativeLocation {
	/// Block location with no rotation, as block entities report it.
	pub fn at_block(level: Arc<dyn Level>, pos: BlockPos) -> Self {
		Self {
			level,
			x: f64::from(pos.x),
			y: f64::from(pos.y),
			z: f64::from(pos.z),
			yaw: 0.0,
			pitch: 0.0,
		}
	}

	pub fn block_pos(&self) -> BlockPos {
		BlockPos::new(self.x.floor() as i32, self.y.floor() as i32, self.z.floor() as i32)
	}
}

impl fmt::Debug for NativeLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeLocation")
			.field("level", &self.level.name())
			.field("x", &self.x)
			.field("y", &self.y)
			.field("z", &self.z)
			.field("yaw", &self.yaw)
			.field("pitch", &self.pitch)
			.finish()
	}
}

/// Block entity behind a command-block actor.
pub trait CommandBlockEntity: Send + Sync {
	/// Current display name. May change over the entity's lifetime.
	fn name(&self) -> String;

	/// Delivers one line of output. Host implementations expect this on the authoritative thread.
	fn send_message(&self, message: &str);

	/// Answers from the entity's own permission store.
	fn has_permission(&self, permission: &str) -> bool;

	/// Location of the block the entity is attached to.
	fn location(&self) -> NativeLocation;
}
