//! Implementation on the Web with the atomics target feature enabled.
//!
//! Every worker is a module Web Worker instantiating the same Wasm module and
//! memory. The first message it receives carries the module, the memory, the
//! stack size and a pointer to its [`Context`]. Every later message is either
//! a pointer to a boxed [`Task`] or `null`, which closes the worker once all
//! messages in front of it were handled.
//!
//! Functions still queued when a worker is terminated leak: their boxes are
//! only reachable from the terminated worker's message queue.

mod memory;
mod script;

use std::num::NonZeroUsize;
use std::sync::OnceLock;

use js_sys::Array;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DedicatedWorkerGlobalScope, WorkerOptions, WorkerType};

use crate::context::Context;
use crate::js::{GlobalExt, CROSS_ORIGIN_ISOLATED};
use crate::worker::{Task, MIN_STACK_SIZE};
use crate::{registry, AllocError, WorkerId};

/// Implementation of [`Worker`](crate::Worker).
#[derive(Debug)]
pub(crate) struct Worker {
	/// The Web Worker.
	worker: web_sys::Worker,
	/// Id of the worker.
	id: WorkerId,
	/// If the closing message was already sent, or never will be.
	released: bool,
}

/// Stops a worker from outside its handle.
#[derive(Debug)]
pub(crate) struct Terminator {
	/// The Web Worker.
	worker: web_sys::Worker,
	/// Id of the worker.
	id: WorkerId,
}

impl Worker {
	/// Creates the Web Worker and sends it the initialization message.
	pub(crate) fn spawn(
		context: Context,
		stack_size: NonZeroUsize,
		name: Option<&str>,
	) -> Result<(Self, Terminator), AllocError> {
		if !has_spawn_support() {
			return Err(AllocError::Unsupported);
		}

		let mut options = WorkerOptions::new();
		options.type_(WorkerType::Module);

		if let Some(name) = name {
			options.name(name);
		}

		let id = context.id();
		let worker = script::with_url(|url| {
			let url = url.ok_or_else(|| AllocError::Spawn(String::from("worker script unavailable")))?;
			web_sys::Worker::new_with_options(url, &options)
				.map_err(|error| AllocError::Spawn(format!("{error:?}")))
		})?;

		let context = Box::into_raw(Box::new(EntryContext(context)));
		let init = Array::of4(
			&wasm_bindgen::module(),
			&wasm_bindgen::memory(),
			&stack_size.get().max(MIN_STACK_SIZE).into(),
			&context.into(),
		);

		if let Err(error) = worker.post_message(&init) {
			// SAFETY: We just made this pointer above and the message carrying it was
			// not sent.
			drop(unsafe { Box::from_raw(context) });
			worker.terminate();

			return Err(AllocError::Spawn(format!("{error:?}")));
		}

		memory::watch(&worker, id);

		Ok((
			Self {
				worker: worker.clone(),
				id,
				released: false,
			},
			Terminator { worker, id },
		))
	}

	/// Implementation of [`Worker::post()`](crate::Worker::post()).
	pub(crate) fn post(&self, id: WorkerId, task: Task) {
		if !registry::contains(id) {
			tracing::warn!(worker = %id, "worker already terminated, posted function dropped");
			return;
		}

		let task = Box::into_raw(Box::new(task));

		if let Err(error) = self.worker.post_message(&task.into()) {
			// SAFETY: We just made this pointer above and the message carrying it was
			// not sent.
			drop(unsafe { Box::from_raw(task) });
			tracing::warn!(worker = %id, ?error, "posted function dropped");
		}
	}

	/// Implementation of [`Worker::release()`](crate::Worker::release()).
	pub(crate) fn release(&mut self) {
		if self.released {
			return;
		}

		self.released = true;
		// Released workers are left to finish their queue.
		registry::unregister(self.id);

		if let Err(error) = self.worker.post_message(&JsValue::NULL) {
			tracing::warn!(?error, "closing message could not be sent, terminating");
			self.terminate();
		}
	}

	/// Implementation of [`Worker::detach()`](crate::Worker::detach()).
	pub(crate) fn detach(&mut self) {
		self.released = true;
	}

	/// Implementation of [`Worker::terminate()`](crate::Worker::terminate()).
	pub(crate) fn terminate(&mut self) {
		self.released = true;
		self.worker.terminate();
		memory::terminated(self.id);
	}
}

impl Terminator {
	/// Terminates the worker.
	pub(crate) fn terminate(&self) {
		self.worker.terminate();
		memory::terminated(self.id);
	}
}

/// [`Context`] as sent to [`__wasm_worker_entry()`].
#[doc(hidden)]
#[allow(missing_debug_implementations, unreachable_pub)]
pub struct EntryContext(Context);

/// Entry function of the worker, called from `worker.js`. Returns the id of
/// the worker as a number.
///
/// # Safety
///
/// `context` has to be a valid pointer to an [`EntryContext`].
#[doc(hidden)]
#[wasm_bindgen]
#[allow(unreachable_pub)]
pub unsafe fn __wasm_worker_entry(context: *mut EntryContext) -> JsValue {
	// SAFETY: Has to be a valid pointer to an `EntryContext`. We only call
	// `__wasm_worker_entry` from `worker.js`. The data sent to it comes only from
	// `Worker::spawn()`.
	let EntryContext(context) = *unsafe { Box::from_raw(context) };
	let id = context.id();
	context.enter();

	let global: DedicatedWorkerGlobalScope = js_sys::global().unchecked_into();
	memory::report(&global, id);

	tracing::debug!(worker = %id, "worker started");
	memory::to_js(id)
}

/// Handles a message sent by [`Worker::post()`] or [`Worker::release()`].
/// Returns `false` if the worker has to close.
///
/// # Safety
///
/// `message` has to be `null` or the address of a [`Task`] sent by
/// [`Worker::post()`].
#[doc(hidden)]
#[wasm_bindgen]
#[allow(unreachable_pub)]
pub unsafe fn __wasm_worker_run(message: JsValue) -> bool {
	let Some(address) = message.as_f64() else {
		if let Some(id) = crate::self_id() {
			tracing::debug!(worker = %id, "worker finished");
		}

		return false;
	};

	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	let task = address as usize as *mut Task;
	// SAFETY: Has to be a valid pointer to a `Task`. Numbers are only sent by
	// `Worker::post()`, which leaked the `Box` before sending its address.
	let task = *unsafe { Box::from_raw(task) };
	task();

	true
}

/// Implementation of [`has_spawn_support()`](crate::has_spawn_support()).
pub(crate) fn has_spawn_support() -> bool {
	/// Support doesn't change over the lifetime of the page.
	static HAS_SPAWN_SUPPORT: OnceLock<bool> = OnceLock::new();

	*HAS_SPAWN_SUPPORT.get_or_init(|| {
		*CROSS_ORIGIN_ISOLATED && {
			let global: GlobalExt = js_sys::global().unchecked_into();
			!global.worker().is_undefined()
		}
	})
}
