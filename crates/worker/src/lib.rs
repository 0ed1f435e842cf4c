//! Authoritative-thread executor and cross-thread dispatch primitives.
//!
//! The host simulation is single-threaded-authoritative: one thread owns every
//! entity mutation. [`MainThread`] is that thread's job queue, and
//! [`Dispatch`] is the contract the rest of the workspace programs against.

mod budget;
mod class;
mod dispatch;
mod main_thread;

pub use budget::{DrainBudget, DrainReport};
pub use class::JobKind;
pub use dispatch::{Dispatch, DispatchError, DispatchExt, Job};
pub use main_thread::{MainThread, MainThreadHandle, MainThreadStats};
