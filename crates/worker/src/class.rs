/// Shared job classes used for authoritative-thread dispatch and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
	/// Work whose submitter blocks until it has executed.
	Sync,
	/// Work queued for a later tick with no completion signal.
	Async,
}

impl JobKind {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Sync => "sync",
			Self::Async => "async",
		}
	}
}
