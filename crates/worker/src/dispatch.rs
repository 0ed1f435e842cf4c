//! Cross-thread dispatch contract for the authoritative thread.
//!
//! The host simulation owns exactly one thread that may mutate entities.
//! Everything else submits work through [`Dispatch`], either waiting for it
//! ([`Dispatch::run_sync`]) or leaving it for a later tick
//! ([`Dispatch::run_async`]).

use std::sync::Arc;

use parking_lot::Mutex;

/// Unit of work executed on the authoritative thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Error returned when work cannot be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
	/// The executor has been shut down.
	Stopped,
}

/// Scheduler able to run work on the single authoritative thread.
pub trait Dispatch: Send + Sync {
	/// Returns true when the calling thread is the authoritative thread.
	fn is_authoritative(&self) -> bool;

	/// Runs `job` on the authoritative thread and blocks until it has executed.
	///
	/// Called from the authoritative thread itself, the job runs inline.
	/// If the executor stops before the job runs, the caller is released and
	/// the job is dropped.
	fn run_sync(&self, job: Job);

	/// Queues `job` to run on the authoritative thread at some later point.
	fn run_async(&self, job: Job);
}

/// Convenience helpers layered over [`Dispatch`].
pub trait DispatchExt: Dispatch {
	/// Runs `f` on the authoritative thread and returns its result.
	///
	/// Returns `None` if the job was dropped or panicked.
	fn sync_call<R, F>(&self, f: F) -> Option<R>
	where
		F: FnOnce() -> R + Send + 'static,
		R: Send + 'static,
	{
		let slot = Arc::new(Mutex::new(None));
		let out = Arc::clone(&slot);
		self.run_sync(Box::new(move || {
			*out.lock() = Some(f());
		}));
		slot.lock().take()
	}
}

impl<D: Dispatch + ?Sized> DispatchExt for D {}

impl<D: Dispatch + ?Sized> Dispatch for Arc<D> {
	fn is_authoritative(&self) -> bool {
		(**self).is_authoritative()
	}

	fn run_sync(&self, job: Job) {
		(**self).run_sync(job);
	}

	fn run_async(&self, job: Job) {
		(**self).run_async(job);
	}
}
