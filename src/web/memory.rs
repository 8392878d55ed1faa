//! Reclaiming the stack and TLS block wasm-bindgen allocates for every
//! worker in the shared memory.
//!
//! A worker reports the addresses of its memory to the spawning thread right
//! after it started. The memory is freed once the worker reported that it
//! finished, or right away when the worker is terminated.

use std::cell::RefCell;
use std::collections::HashMap;

use js_sys::WebAssembly::Global;
use js_sys::{Array, Number, Object};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::MessageEvent;

use crate::js::{Exports, GlobalDescriptor};
use crate::WorkerId;

/// Addresses of the memory allocated for one worker.
#[derive(Clone, Copy, Debug)]
pub(super) struct ThreadMemory {
	/// TLS block.
	tls_base: f64,
	/// Stack.
	stack_alloc: f64,
}

/// What the spawning thread knows about a worker's memory.
#[derive(Debug)]
enum Slot {
	/// The worker didn't report its memory yet.
	Starting,
	/// The worker runs on this memory.
	Running(ThreadMemory),
	/// The worker was terminated before it reported its memory.
	Terminated,
}

thread_local! {
	/// Memory of every worker spawned from this thread, keyed by
	/// [`WorkerId`].
	static SLOTS: RefCell<HashMap<u64, Slot>> = RefCell::new(HashMap::new());
	/// Message handler shared by all workers spawned from this thread.
	static HANDLER: Closure<dyn Fn(MessageEvent)> =
		Closure::new(|event: MessageEvent| on_message(&event.data()));
}

impl ThreadMemory {
	/// Reads the addresses of the calling worker's memory.
	fn current() -> Self {
		let exports: Exports = wasm_bindgen::exports().unchecked_into();

		Self {
			tls_base: Number::unchecked_from_js(exports.tls_base().value()).value_of(),
			stack_alloc: Number::unchecked_from_js(exports.stack_alloc().value()).value_of(),
		}
	}

	/// Frees the memory.
	///
	/// # Safety
	///
	/// The worker owning this memory must not execute any Wasm code anymore.
	unsafe fn free(self) {
		thread_local! {
			static EXPORTS: Exports = wasm_bindgen::exports().unchecked_into();
			static DESCRIPTOR: GlobalDescriptor = {
				let descriptor: GlobalDescriptor = Object::new().unchecked_into();
				descriptor.set_value("i32");
				descriptor
			};
		}

		let globals = DESCRIPTOR.with(|descriptor| {
			Global::new(descriptor, &self.tls_base.into()).and_then(|tls_base| {
				Global::new(descriptor, &self.stack_alloc.into())
					.map(|stack_alloc| (tls_base, stack_alloc))
			})
		});

		match globals {
			// SAFETY: The caller guarantees the worker is done with this memory.
			Ok((tls_base, stack_alloc)) => EXPORTS.with(|exports| unsafe {
				exports.thread_destroy(&tls_base, &stack_alloc);
			}),
			Err(error) => tracing::warn!(?error, "worker memory could not be freed"),
		}
	}
}

/// Starts tracking the memory of a freshly spawned worker.
pub(super) fn watch(worker: &web_sys::Worker, id: WorkerId) {
	SLOTS.with(|slots| slots.borrow_mut().insert(id.as_u64().get(), Slot::Starting));
	HANDLER.with(|handler| worker.set_onmessage(Some(handler.as_ref().unchecked_ref())));
}

/// Reports the memory of the calling worker to the thread that spawned it.
/// Called by the worker before it runs any posted function.
pub(super) fn report(global: &web_sys::DedicatedWorkerGlobalScope, id: WorkerId) {
	let ThreadMemory {
		tls_base,
		stack_alloc,
	} = ThreadMemory::current();
	let message = Array::of3(&to_js(id), &tls_base.into(), &stack_alloc.into());

	if let Err(error) = global.post_message(&message) {
		tracing::warn!(worker = %id, ?error, "worker memory could not be reported and will leak");
	}
}

/// Frees the memory of a worker that was just terminated.
pub(super) fn terminated(id: WorkerId) {
	let id = id.as_u64().get();

	let memory = SLOTS.with(|slots| {
		let mut slots = slots.borrow_mut();

		match slots.get(&id) {
			Some(Slot::Running(memory)) => {
				let memory = *memory;
				slots.remove(&id);
				Some(memory)
			}
			Some(Slot::Starting) => {
				slots.insert(id, Slot::Terminated);
				None
			}
			Some(Slot::Terminated) | None => None,
		}
	});

	if let Some(memory) = memory {
		// SAFETY: The worker was terminated and can't execute anything anymore.
		unsafe { memory.free() };
	}
}

/// Converts a [`WorkerId`] into a JS number.
#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
pub(super) fn to_js(id: WorkerId) -> JsValue {
	(id.as_u64().get() as f64).into()
}

/// Handles a message sent by a worker to the thread that spawned it.
///
/// An array `[id, tlsBase, stackAlloc]` is sent after starting, a number
/// `id` once the worker closed itself and left Wasm for good.
fn on_message(data: &JsValue) {
	if let Some(id) = data.as_f64() {
		let slot = SLOTS.with(|slots| slots.borrow_mut().remove(&from_js(id)));

		if let Some(Slot::Running(memory)) = slot {
			// SAFETY: The worker only sends its id after it closed itself outside of
			// any Wasm call.
			unsafe { memory.free() };
		}

		return;
	}

	let data: &Array = data.unchecked_ref();
	let Some(id) = data.get(0).as_f64().map(from_js) else {
		tracing::warn!(?data, "unexpected message from worker");
		return;
	};
	let memory = ThreadMemory {
		tls_base: data.get(1).as_f64().unwrap_or_default(),
		stack_alloc: data.get(2).as_f64().unwrap_or_default(),
	};

	let terminated = SLOTS.with(|slots| {
		let mut slots = slots.borrow_mut();

		if let Some(Slot::Terminated) = slots.get(&id) {
			slots.remove(&id);
			true
		} else {
			slots.insert(id, Slot::Running(memory));
			false
		}
	});

	if terminated {
		// SAFETY: The worker was terminated after it sent this message.
		unsafe { memory.free() };
	}
}

/// Converts a JS number back into the raw value of a [`WorkerId`].
#[allow(
	clippy::as_conversions,
	clippy::cast_possible_truncation,
	clippy::cast_sign_loss
)]
fn from_js(id: f64) -> u64 {
	id as u64
}
