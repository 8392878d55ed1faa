//! The "hello worker" sequence: allocate a worker and post a greeting to it.
//!
//! ```
//! let worker = wasm_worker::launcher::launch()?;
//! # #[cfg(not(target_family = "wasm"))]
//! worker.join().unwrap();
//! # Ok::<(), wasm_worker::AllocError>(())
//! ```

use crate::{report, AllocError, Worker, WorkerBuilder};

/// Greeting written by the worker.
pub const MESSAGE: &str = "Hello from wasm worker!\n";

/// Stack size of the launched worker in bytes.
pub const STACK_SIZE: usize = 1024;

/// Result code reported after greeting.
pub const RESULT_CODE: i32 = 0;

/// Allocates a worker with a [`STACK_SIZE`] byte stack and posts the greeting
/// to it, which is [printed](print()).
///
/// Returns without waiting for the worker.
///
/// # Errors
///
/// See [`WorkerBuilder::spawn()`].
pub fn launch() -> Result<Worker, AllocError> {
	launch_with(WorkerBuilder::new(STACK_SIZE), print)
}

/// Allocates a worker from `builder` and posts the greeting to it.
///
/// On the worker, [`MESSAGE`] is passed to `output`, then [`RESULT_CODE`] is
/// [reported](crate::report_result()).
///
/// # Errors
///
/// See [`WorkerBuilder::spawn()`].
pub fn launch_with<F>(builder: WorkerBuilder, output: F) -> Result<Worker, AllocError>
where
	F: 'static + FnOnce(&str) + Send,
{
	let worker = builder.spawn()?;
	worker.post(move || greet(output));

	Ok(worker)
}

/// Runs on the worker.
fn greet<F: FnOnce(&str)>(output: F) {
	output(MESSAGE);
	report::report_result(RESULT_CODE);
}

/// Writes `message` to stdout, or to the console on the Web.
pub fn print(message: &str) {
	#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
	{
		use std::io::{self, Write};

		let mut stdout = io::stdout().lock();

		if let Err(error) = stdout
			.write_all(message.as_bytes())
			.and_then(|()| stdout.flush())
		{
			tracing::warn!(%error, "failed to write to stdout");
		}
	}
	#[cfg(all(target_family = "wasm", target_os = "unknown"))]
	web_sys::console::log_1(&message.trim_end_matches('\n').into());
}
