//! Optional result reporting for test harnesses.

use crate::context;

/// Receives result codes signalled by posted functions through
/// [`report_result()`].
///
/// Implemented for every `Fn(i32) + Send + Sync` closure.
///
/// ```
/// use std::sync::mpsc;
/// use std::sync::Mutex;
///
/// let (sender, receiver) = mpsc::channel();
/// let sender = Mutex::new(sender);
///
/// let worker = wasm_worker::WorkerBuilder::new(1024)
/// 	.reporter(move |code: i32| sender.lock().unwrap().send(code).unwrap())
/// 	.spawn()?;
/// worker.post(|| wasm_worker::report_result(0));
///
/// assert_eq!(receiver.recv(), Ok(0));
/// # Ok::<(), wasm_worker::AllocError>(())
/// ```
pub trait Reporter: Send + Sync {
	/// Called with the code passed to [`report_result()`].
	fn report_result(&self, code: i32);
}

impl<F> Reporter for F
where
	F: Fn(i32) + Send + Sync,
{
	fn report_result(&self, code: i32) {
		self(code);
	}
}

/// Signals `code` to the [`Reporter`] of the current worker.
///
/// Does nothing if the worker was spawned without a reporter or if called
/// outside of a worker.
pub fn report_result(code: i32) {
	if let Some(reporter) = context::reporter() {
		reporter.report_result(code);
	} else {
		tracing::trace!(code, "no reporter installed, result dropped");
	}
}
