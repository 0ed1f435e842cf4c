//! Authoritative-thread job queue.
//!
//! A [`MainThread`] runs in one of two modes:
//!
//! * attached: [`MainThread::attach_current`] makes the calling thread
//!   authoritative, and queued work runs whenever that thread calls
//!   [`MainThread::drain`] (typically once per simulation tick).
//! * dedicated: [`MainThread::spawn`] starts a named OS thread that executes
//!   work as soon as it arrives.
//!
//! Both modes share the same [`Dispatch`] implementation.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::{Dispatch, DispatchError, DrainBudget, DrainReport, Job, JobKind};


enum Envelope {
	Run {
		job: Job,
		kind: JobKind,
		done: Option<oneshot::Sender<()>>,
	},
	Stop,
}

struct Shared {
	name: String,
	owner: OnceLock<ThreadId>,
	tx: mpsc::UnboundedSender<Envelope>,
	rx: Mutex<mpsc::UnboundedReceiver<Envelope>>,
	stopped: AtomicBool,
	queued: AtomicUsize,
	executed: AtomicU64,
	panicked: AtomicU64,
}

impl Shared {
	fn enqueue(&self, job: Job, kind: JobKind, done: Option<oneshot::Sender<()>>) -> Result<(), DispatchError> {
		if self.stopped.load(Ordering::Acquire) {
			return Err(DispatchError::Stopped);
		}
		self.queued.fetch_add(1, Ordering::AcqRel);
		if self.tx.send(Envelope::Run { job, kind, done }).is_err() {
			self.queued.fetch_sub(1, Ordering::AcqRel);
			return Err(DispatchError::Stopped);
		}
		Ok(())
	}

	fn run(&self, job: Job, kind: JobKind) {
		if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
			self.panicked.fetch_add(1, Ordering::Relaxed);
			tracing::error!(
				main_thread = %self.name,
				job_kind = kind.as_str(),
				panic = panic_message(payload.as_ref()),
				"main_thread.job_panicked"
			);
		}
		self.executed.fetch_add(1, Ordering::Relaxed);
	}

	fn run_queued(&self, job: Job, kind: JobKind, done: Option<oneshot::Sender<()>>) {
		self.queued.fetch_sub(1, Ordering::AcqRel);
		self.run(job, kind);
		if let Some(done) = done {
			let _ = done.send(());
		}
	}

	/// Closes the queue and drops everything still in it, releasing blocked submitters.
	fn close(&self, rx: &mut mpsc::UnboundedReceiver<Envelope>) {
		self.stopped.store(true, Ordering::Release);
		rx.close();
		let mut dropped = 0usize;
		while let Ok(envelope) = rx.try_recv() {
			if let Envelope::Run { .. } = envelope {
				self.queued.fetch_sub(1, Ordering::AcqRel);
				dropped += 1;
			}
		}
		tracing::debug!(main_thread = %self.name, dropped, "main_thread.closed");
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		msg
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg.as_str()
	} else {
		"<non-string panic payload>"
	}
}

/// Counters for one executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainThreadStats {
	/// Jobs waiting to run.
	pub pending: usize,
	/// Jobs that have run, including ones that panicked.
	pub executed: u64,
	/// Jobs that panicked.
	pub panicked: u64,
}

/// Job queue owned by the authoritative thread.
#[derive(Clone)]
pub struct MainThread {
	shared: Arc<Shared>,
}

impl std::fmt::Debug for MainThread {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MainThread")
			.field("name", &self.shared.name)
			.field("owner", &self.shared.owner.get())
			.field("stats", &self.stats())
			.finish()
	}
}

impl MainThread {
	fn with_name(name: String) -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		Self {
			shared: Arc::new(Shared {
				name,
				owner: OnceLock::new(),
				tx,
				rx: Mutex::new(rx),
				stopped: AtomicBool::new(false),
				queued: AtomicUsize::new(0),
				executed: AtomicU64::new(0),
				panicked: AtomicU64::new(0),
			}),
		}
	}

	/// Makes the calling thread authoritative.
	///
	/// Queued work runs only when this thread calls [`Self::drain`].
	pub fn attach_current(name: impl Into<String>) -> Self {
		let this = Self::with_name(name.into());
		let _ = this.shared.owner.set(thread::current().id());
		tracing::debug!(main_thread = %this.shared.name, "main_thread.attached");
		this
	}

	/// Spawns a dedicated authoritative thread that executes work as it arrives.
	pub fn spawn(name: impl Into<String>) -> std::io::Result<MainThreadHandle> {
		let this = Self::with_name(name.into());
		let shared = Arc::clone(&this.shared);
		let thread = thread::Builder::new().name(this.shared.name.clone()).spawn(move || run_loop(&shared))?;
		let _ = this.shared.owner.set(thread.thread().id());
		tracing::debug!(main_thread = %this.shared.name, "main_thread.spawned");
		Ok(MainThreadHandle {
			main: this,
			thread: Some(thread),
		})
	}

	/// Returns the executor name.
	pub fn name(&self) -> &str {
		&self.shared.name
	}

	/// Runs queued work on the authoritative thread under one budget.
	///
	/// Calls from any other thread, or from inside a job running on a
	/// dedicated thread, execute nothing.
	pub fn drain(&self, budget: DrainBudget) -> DrainReport {
		if !self.is_authoritative() {
			tracing::warn!(main_thread = %self.shared.name, "main_thread.drain_off_thread");
			return DrainReport {
				pending: self.shared.queued.load(Ordering::Acquire),
				..DrainReport::default()
			};
		}

		let deadline = Instant::now().checked_add(budget.duration);
		let out_of_budget = |executed: usize| executed >= budget.max_jobs || deadline.is_some_and(|d| Instant::now() >= d);
		let mut executed = 0usize;

		while !out_of_budget(executed) {
			let next = {
				let Some(mut rx) = self.shared.rx.try_lock() else {
					break;
				};
				match rx.try_recv() {
					Ok(Envelope::Stop) => {
						self.shared.close(&mut rx);
						None
					}
					Ok(run) => Some(run),
					Err(_) => None,
				}
			};
			let Some(Envelope::Run { job, kind, done }) = next else {
				break;
			};
			self.shared.run_queued(job, kind, done);
			executed += 1;
		}

		DrainReport {
			executed,
			pending: self.shared.queued.load(Ordering::Acquire),
			budget_exhausted: out_of_budget(executed),
		}
	}

	/// Runs every queued job, including jobs enqueued while draining.
	pub fn drain_all(&self) -> DrainReport {
		self.drain(DrainBudget::unbounded())
	}

	/// Stops accepting work.
	///
	/// Work already queued ahead of the stop marker still runs. Anything left
	/// after it is dropped and blocked submitters are released.
	pub fn shutdown(&self) {
		if self.shared.stopped.swap(true, Ordering::AcqRel) {
			return;
		}
		let _ = self.shared.tx.send(Envelope::Stop);
		tracing::debug!(main_thread = %self.shared.name, "main_thread.shutdown_requested");
	}

	/// Returns a counters snapshot.
	pub fn stats(&self) -> MainThreadStats {
		MainThreadStats {
			pending: self.shared.queued.load(Ordering::Acquire),
			executed: self.shared.executed.load(Ordering::Relaxed),
			panicked: self.shared.panicked.load(Ordering::Relaxed),
		}
	}
}

fn run_loop(shared: &Shared) {
	let mut rx = shared.rx.lock();
	while let Some(envelope) = rx.blocking_recv() {
		match envelope {
			Envelope::Run { job, kind, done } => shared.run_queued(job, kind, done),
			Envelope::Stop => break,
		}
	}
	shared.close(&mut rx);
}

impl Dispatch for MainThread {
	fn is_authoritative(&self) -> bool {
		self.shared.owner.get() == Some(&thread::current().id())
	}

	fn run_sync(&self, job: Job) {
		if self.is_authoritative() {
			tracing::trace!(main_thread = %self.shared.name, "main_thread.run_sync.inline");
			self.shared.run(job, JobKind::Sync);
			return;
		}

		let (done_tx, done_rx) = oneshot::channel();
		if let Err(err) = self.shared.enqueue(job, JobKind::Sync, Some(done_tx)) {
			tracing::warn!(main_thread = %self.shared.name, ?err, "main_thread.run_sync.rejected");
			return;
		}
		tracing::trace!(main_thread = %self.shared.name, "main_thread.run_sync.queued");
		if done_rx.blocking_recv().is_err() {
			tracing::warn!(main_thread = %self.shared.name, "main_thread.run_sync.dropped");
		}
	}

	fn run_async(&self, job: Job) {
		match self.shared.enqueue(job, JobKind::Async, None) {
			Ok(()) => tracing::trace!(main_thread = %self.shared.name, "main_thread.run_async.queued"),
			Err(err) => tracing::warn!(main_thread = %self.shared.name, ?err, "main_thread.run_async.rejected"),
		}
	}
}

/// Owner of a dedicated authoritative thread.
///
/// Dropping the handle shuts the executor down and joins the thread.
#[derive(Debug)]
pub struct MainThreadHandle {
	main: MainThread,
	thread: Option<JoinHandle<()>>,
}

impl MainThreadHandle {
	/// Returns a cloneable dispatcher for the dedicated thread.
	pub fn main_thread(&self) -> &MainThread {
		&self.main
	}

	/// Shuts the executor down and waits for the thread to exit.
	pub fn join(mut self) {
		self.stop_and_join();
	}

	fn stop_and_join(&mut self) {
		self.main.shutdown();
		if let Some(thread) = self.thread.take()
			&& thread.thread().id() != thread::current().id()
			&& thread.join().is_err()
		{
			tracing::error!(main_thread = %self.main.shared.name, "main_thread.join_failed");
		}
	}
}

impl Drop for MainThreadHandle {
	fn drop(&mut self) {
		self.stop_and_join();
	}
}
