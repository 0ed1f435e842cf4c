use std::time::Duration;

/// Bounds for one [`crate::MainThread::drain`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainBudget {
	/// Wall-clock time the pass may spend running jobs.
	pub duration: Duration,
	/// Maximum number of jobs executed in the pass.
	pub max_jobs: usize,
}

impl DrainBudget {
	/// Budget that runs every job queued at the time of the call and anything they enqueue.
	pub const fn unbounded() -> Self {
		Self {
			duration: Duration::MAX,
			max_jobs: usize::MAX,
		}
	}

	/// Budget limited to `max_jobs` executions.
	pub const fn jobs(max_jobs: usize) -> Self {
		Self {
			duration: Duration::MAX,
			max_jobs,
		}
	}
}

impl Default for DrainBudget {
	fn default() -> Self {
		Self {
			duration: Duration::from_millis(50),
			max_jobs: 1024,
		}
	}
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
	/// Jobs executed during the pass.
	pub executed: usize,
	/// Jobs still queued after the pass.
	pub pending: usize,
	/// True when the pass stopped because a budget limit was hit.
	pub budget_exhausted: bool,
}
