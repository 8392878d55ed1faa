//! The worker handle.

mod builder;
mod id;

use std::fmt::{self, Debug, Formatter};
use std::num::NonZeroUsize;
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use std::thread;

pub use self::builder::{malloc, WorkerBuilder};
pub use self::id::WorkerId;
use crate::{r#impl, registry};

/// Type of the functions posted to a worker.
pub(crate) type Task = Box<dyn 'static + FnOnce() + Send>;

/// Smallest stack a worker runs on. Workers host the platform's own
/// bookkeeping (TLS, unwinding, formatting, logging) on top of what the
/// caller asked for.
#[cfg(any(
	not(all(target_family = "wasm", target_os = "unknown")),
	target_feature = "atomics"
))]
pub(crate) const MIN_STACK_SIZE: usize = 64 * 1024;

/// Handle to an allocated worker.
///
/// Only exists after successful allocation, see [`malloc()`] and
/// [`WorkerBuilder`]. Dropping it [releases](Self::release()) the worker.
///
/// On the Web this handle wraps a JS object and therefore can't be sent to
/// other threads.
pub struct Worker {
	/// Platform implementation.
	inner: r#impl::Worker,
	/// Id of this worker.
	id: WorkerId,
	/// Aligned stack size in bytes.
	stack_size: NonZeroUsize,
	/// Name given by [`WorkerBuilder::name()`].
	name: Option<String>,
}

impl Debug for Worker {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter
			.debug_struct("Worker")
			.field("id", &self.id)
			.field("stack_size", &self.stack_size)
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

impl Drop for Worker {
	fn drop(&mut self) {
		self.inner.release();
	}
}

impl Worker {
	/// Posts `task` to this worker and returns immediately.
	///
	/// Functions posted to the same worker run one at a time, in the order
	/// they were posted. Nothing is promised about when they run relative to
	/// the caller.
	///
	/// If the worker already stopped, e.g. through [`terminate_all()`](crate::terminate_all()),
	/// `task` is dropped without running.
	pub fn post<F>(&self, task: F)
	where
		F: 'static + FnOnce() + Send,
	{
		self.inner.post(self.id, Box::new(task));
	}

	/// Returns the [`WorkerId`] of this worker.
	#[must_use]
	pub const fn id(&self) -> WorkerId {
		self.id
	}

	/// Returns the stack size in bytes, after rounding up to a multiple of 16.
	///
	/// Workers run on at least 64 KiB, even if a smaller stack was requested.
	#[must_use]
	pub const fn stack_size(&self) -> NonZeroUsize {
		self.stack_size
	}

	/// Returns the name given by [`WorkerBuilder::name()`].
	#[must_use]
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Releases the worker. Functions already posted still run, afterwards
	/// the worker exits.
	///
	/// Equivalent to dropping the handle.
	pub fn release(self) {
		drop(self);
	}

	/// Gives up the handle without releasing the worker.
	///
	/// The worker keeps waiting for functions until the process ends or
	/// [`terminate_all()`](crate::terminate_all()) stops it. Functions posted
	/// before detaching still run.
	pub fn detach(mut self) {
		self.inner.detach();
		tracing::debug!(worker = %self.id, "worker detached");
	}

	/// Stops the worker as soon as possible.
	///
	/// Natively the function currently running finishes but all queued
	/// functions are discarded. On the Web the worker is terminated
	/// immediately.
	pub fn terminate(mut self) {
		self.inner.terminate();
		registry::unregister(self.id);
		tracing::debug!(worker = %self.id, "worker terminated");
	}

	/// Releases the worker and blocks until it ran every posted function.
	///
	/// Not available on the Web, where the main thread is not allowed to
	/// block.
	///
	/// # Errors
	///
	/// Returns the panic payload if the worker thread itself panicked. Panics
	/// inside posted functions are caught and don't surface here.
	#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
	pub fn join(mut self) -> thread::Result<()> {
		self.inner.release();
		self.inner.join()
	}
}
