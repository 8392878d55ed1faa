//! Per-worker state, set once when a worker starts.

use std::cell::OnceCell;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::{Reporter, WorkerId};

thread_local! {
	/// [`Context`] of the worker running on this thread, if any.
	static CONTEXT: OnceCell<Context> = const { OnceCell::new() };
}

/// Data handed to a worker when it is spawned.
pub(crate) struct Context {
	/// [`WorkerId`] of the worker.
	id: WorkerId,
	/// Injected [`Reporter`].
	reporter: Option<Arc<dyn Reporter>>,
}

impl Debug for Context {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter
			.debug_struct("Context")
			.field("id", &self.id)
			.field("reporter", &self.reporter.is_some())
			.finish()
	}
}

impl Context {
	/// Creates a new [`Context`].
	pub(crate) fn new(id: WorkerId, reporter: Option<Arc<dyn Reporter>>) -> Self {
		Self { id, reporter }
	}

	/// Returns the [`WorkerId`].
	pub(crate) const fn id(&self) -> WorkerId {
		self.id
	}

	/// Registers the context for the current thread. Must be called from the
	/// worker itself before running any posted function.
	pub(crate) fn enter(self) {
		CONTEXT.with(|cell| {
			cell.set(self)
				.expect("worker context already registered on this thread");
		});
	}
}

/// Returns the [`WorkerId`] of the worker the caller runs on.
///
/// Returns [`None`] on the main thread and on any thread not allocated by
/// this crate.
#[must_use]
pub fn self_id() -> Option<WorkerId> {
	CONTEXT.with(|cell| cell.get().map(Context::id))
}

/// Returns `true` if the caller runs on a worker allocated by this crate.
#[must_use]
pub fn is_worker() -> bool {
	self_id().is_some()
}

/// Returns the [`Reporter`] of the current worker.
pub(crate) fn reporter() -> Option<Arc<dyn Reporter>> {
	CONTEXT.with(|cell| cell.get().and_then(|context| context.reporter.clone()))
}
