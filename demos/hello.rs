//! Allocates a worker with a 1024 byte stack, posts a greeting to it and
//! exits without waiting on the Web.
//!
//! Set `REPORT_RESULT` to log the result code the worker reports.

#![allow(clippy::missing_docs_in_private_items)]

#[cfg(not(target_family = "wasm"))]
use {std::env, std::panic, tracing_subscriber::EnvFilter};

use wasm_worker::{launcher, WorkerBuilder};

fn main() {
	#[cfg(not(target_family = "wasm"))]
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();
	#[cfg(target_family = "wasm")]
	console_error_panic_hook::set_once();

	#[cfg_attr(target_family = "wasm", allow(unused_mut))]
	let mut builder = WorkerBuilder::new(launcher::STACK_SIZE);

	#[cfg(not(target_family = "wasm"))]
	if env::var_os("REPORT_RESULT").is_some() {
		builder = builder.reporter(|code: i32| tracing::info!(code, "result reported"));
	}

	let worker = match launcher::launch_with(builder, launcher::print) {
		Ok(worker) => worker,
		Err(error) => panic!("failed to allocate worker: {error}"),
	};

	// Nothing keeps the process alive for the worker natively.
	#[cfg(not(target_family = "wasm"))]
	if let Err(error) = worker.join() {
		panic::resume_unwind(error);
	}
	#[cfg(target_family = "wasm")]
	drop(worker);
}
