//! Command blocks as world-editing actors.
//!
//! A command block has no persistent identity, lives on a single-threaded
//! simulation, and can vanish whenever its chunk unloads. This crate wraps one
//! in a [`CommandBlockActor`] that the editing framework can address like a
//! player:
//!
//! * identity is derived once from the block's name ([`Identity::derive`]),
//! * output is marshalled onto the authoritative thread
//!   ([`ThreadAffineMessenger`]),
//! * session validity is a cached, lazily converging flag
//!   ([`LivenessTracker`]) that any thread can read without blocking.

mod command_block;
mod error;
pub mod host;
mod identity;
mod liveness;
pub mod location;
mod messenger;
mod permission;
mod platform;
pub mod sim;

pub use command_block::CommandBlockActor;
pub use error::{ActorError, AuthorizationError};
pub use identity::{COMMAND_BLOCK_PREFIX, Identity};
pub use liveness::{BlockSessionKey, Liveness, LivenessTracker};
pub use messenger::{Severity, ThreadAffineMessenger, split_lines};
pub use permission::{OVERRIDE_BEDROCK, PermissionGateway, PermissionTable};
pub use platform::{Actor, Locatable, PlatformContext, SessionKey};
