use std::fmt::{self, Debug, Formatter};
use std::num::NonZeroUsize;
use std::sync::Arc;

use super::{Worker, WorkerId};
use crate::context::Context;
use crate::{r#impl, registry, AllocError, Reporter};

/// Alignment of worker stacks in bytes.
const STACK_ALIGN: usize = 16;

/// Configures a [`Worker`] before allocating it.
///
/// ```
/// use wasm_worker::WorkerBuilder;
///
/// let worker = WorkerBuilder::new(64 * 1024)
/// 	.name(String::from("background"))
/// 	.spawn()?;
/// assert_eq!(worker.name(), Some("background"));
/// # Ok::<(), wasm_worker::AllocError>(())
/// ```
#[must_use = "does nothing unless spawned"]
pub struct WorkerBuilder {
	/// Requested stack size in bytes.
	stack_size: usize,
	/// Name of the thread or Web Worker.
	name: Option<String>,
	/// Injected [`Reporter`].
	reporter: Option<Arc<dyn Reporter>>,
}

impl Debug for WorkerBuilder {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
		formatter
			.debug_struct("WorkerBuilder")
			.field("stack_size", &self.stack_size)
			.field("name", &self.name)
			.field("reporter", &self.reporter.is_some())
			.finish()
	}
}

impl WorkerBuilder {
	/// Creates a builder for a worker with a stack of `stack_size` bytes.
	///
	/// The stack size is rounded up to a multiple of 16 when spawning.
	pub const fn new(stack_size: usize) -> Self {
		Self {
			stack_size,
			name: None,
			reporter: None,
		}
	}

	/// Names the worker. Shows up as the thread name natively and as the
	/// Web Worker name in browser dev tools.
	pub fn name(mut self, name: String) -> Self {
		self.name = Some(name);
		self
	}

	/// Injects the [`Reporter`] receiving codes passed to
	/// [`report_result()`](crate::report_result()) on this worker.
	pub fn reporter<R>(mut self, reporter: R) -> Self
	where
		R: 'static + Reporter,
	{
		self.reporter = Some(Arc::new(reporter));
		self
	}

	/// Allocates the worker.
	///
	/// # Errors
	///
	/// - [`AllocError::InvalidStackSize`] if the stack size is `0` or can't
	///   be aligned.
	/// - [`AllocError::Spawn`] if the platform couldn't provision the worker.
	/// - [`AllocError::Unsupported`] if this target can't spawn workers.
	pub fn spawn(self) -> Result<Worker, AllocError> {
		let stack_size = align_stack_size(self.stack_size).ok_or(AllocError::InvalidStackSize {
			requested: self.stack_size,
		})?;

		let id = WorkerId::new();
		let context = Context::new(id, self.reporter);

		let (worker, terminator) =
			match r#impl::Worker::spawn(context, stack_size, self.name.as_deref()) {
				Ok(spawned) => spawned,
				Err(error) => {
					tracing::warn!(worker = %id, %error, "worker allocation failed");
					return Err(error);
				}
			};

		registry::register(id, terminator);
		tracing::debug!(
			worker = %id,
			stack_size = stack_size.get(),
			name = self.name.as_deref(),
			"worker allocated"
		);

		Ok(Worker {
			inner: worker,
			id,
			stack_size,
			name: self.name,
		})
	}
}

/// Allocates a worker with a stack of `stack_size` bytes.
///
/// Shorthand for [`WorkerBuilder::new(stack_size).spawn()`](WorkerBuilder).
///
/// # Errors
///
/// See [`WorkerBuilder::spawn()`].
pub fn malloc(stack_size: usize) -> Result<Worker, AllocError> {
	WorkerBuilder::new(stack_size).spawn()
}

/// Rounds `stack_size` up to [`STACK_ALIGN`]. Returns [`None`] for `0` or on
/// overflow.
fn align_stack_size(stack_size: usize) -> Option<NonZeroUsize> {
	let aligned = stack_size.checked_add(STACK_ALIGN - 1)? & !(STACK_ALIGN - 1);
	NonZeroUsize::new(aligned)
}

#[cfg(test)]
mod tests {
	use super::align_stack_size;

	#[test]
	fn align() {
		assert_eq!(align_stack_size(0), None, "zero accepted");
		assert_eq!(align_stack_size(1).map(|size| size.get()), Some(16), "not rounded up");
		assert_eq!(align_stack_size(16).map(|size| size.get()), Some(16), "already aligned");
		assert_eq!(align_stack_size(17).map(|size| size.get()), Some(32), "not rounded up");
		assert_eq!(
			align_stack_size(1024).map(|size| size.get()),
			Some(1024),
			"already aligned"
		);
	}

	#[test]
	fn overflow() {
		assert_eq!(align_stack_size(usize::MAX), None, "overflow accepted");
		assert_eq!(
			align_stack_size(usize::MAX - 15).map(|size| size.get()),
			Some(usize::MAX - 15),
			"largest aligned size rejected"
		);
	}
}
