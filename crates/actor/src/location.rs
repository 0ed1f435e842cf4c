//! Framework-side locations and the adapter from host locations.

use std::fmt;
use std::sync::Arc;

use crate::host::{Level, NativeLocation};

/// A world as the editing framework sees it.
pub trait Extent: fmt::Debug + Send + Sync {
	fn name(&self) -> &str;
}

/// Double-precision position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vector3 {
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}
}

/// Position, orientation and the extent they belong to.
#[derive(Debug, Clone)]
pub struct Location {
	extent: Arc<dyn Extent>,
	position: Vector3,
	yaw: f32,
	pitch: f32,
}

impl Location {
	pub fn new(extent: Arc<dyn Extent>, position: Vector3, yaw: f32, pitch: f32) -> Self {
		Self {
			extent,
			position,
			yaw,
			pitch,
		}
	}

	pub fn extent(&self) -> &Arc<dyn Extent> {
		&self.extent
	}

	pub fn position(&self) -> Vector3 {
		self.position
	}

	pub fn yaw(&self) -> f32 {
		self.yaw
	}

	pub fn pitch(&self) -> f32 {
		self.pitch
	}
}

/// Equal when the coordinates match and both refer to the same extent instance.
impl PartialEq for Location {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.extent), Arc::as_ptr(&other.extent))
			&& self.position == other.position
			&& self.yaw == other.yaw
			&& self.pitch == other.pitch
	}
}

/// Converts host locations into framework locations.
pub trait LocationAdapter: Send + Sync {
	fn adapt(&self, native: &NativeLocation) -> Location;
}

/// Adapter that exposes each host level directly as an extent.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectLocationAdapter;

impl LocationAdapter for DirectLocationAdapter {
	fn adapt(&self, native: &NativeLocation) -> Location {
		let extent: Arc<dyn Extent> = Arc::new(LevelExtent {
			level: Arc::clone(&native.level),
		});
		Location::new(extent, Vector3::new(native.x, native.y, native.z), native.yaw, native.pitch)
	}
}

/// Extent backed by a host level.
pub struct LevelExtent {
	level: Arc<dyn Level>,
}

impl LevelExtent {
	pub fn level(&self) -> &Arc<dyn Level> {
		&self.level
	}
}

impl Extent for LevelExtent {
	fn name(&self) -> &str {
		self.level.name()
	}
}

impl fmt::Debug for LevelExtent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LevelExtent").field("level", &self.level.name()).finish()
	}
}
