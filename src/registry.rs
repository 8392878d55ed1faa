//! Bookkeeping of live workers for [`terminate_all()`].
//!
//! Natively the registry is process-wide and a worker removes itself when its
//! thread exits. On the Web it is per thread, as the underlying JS objects
//! can't leave the thread that created them, and a worker is removed as soon
//! as its handle is released or terminated.

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::mem;
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use std::sync::{Mutex, PoisonError};

use crate::r#impl::Terminator;
use crate::WorkerId;

/// Map of all registered workers.
type Registry = BTreeMap<WorkerId, Terminator>;

/// Runs `task` with exclusive access to the [`Registry`].
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
fn with<R>(task: impl FnOnce(&mut Registry) -> R) -> R {
	/// All workers of this process.
	static REGISTRY: Mutex<Registry> = Mutex::new(BTreeMap::new());

	task(&mut REGISTRY.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Runs `task` with exclusive access to the [`Registry`].
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
fn with<R>(task: impl FnOnce(&mut Registry) -> R) -> R {
	thread_local! {
		/// All workers spawned from this thread.
		static REGISTRY: RefCell<Registry> = const { RefCell::new(BTreeMap::new()) };
	}

	REGISTRY.with(|registry| task(&mut registry.borrow_mut()))
}

/// Adds a freshly spawned worker.
pub(crate) fn register(id: WorkerId, terminator: Terminator) {
	let previous = with(|registry| registry.insert(id, terminator));
	debug_assert!(previous.is_none(), "found previous worker with the same `WorkerId`");
}

/// Removes a worker. Does nothing if it was already removed.
pub(crate) fn unregister(id: WorkerId) {
	with(|registry| registry.remove(&id));
}

/// Returns `true` if the worker is still registered.
#[cfg(all(target_family = "wasm", target_os = "unknown", target_feature = "atomics"))]
pub(crate) fn contains(id: WorkerId) -> bool {
	with(|registry| registry.contains_key(&id))
}

/// Terminates every worker allocated by this process that is still running.
///
/// This includes workers whose handle is still alive: functions posted to
/// them afterwards are dropped.
///
/// On the Web this only covers workers allocated from the calling thread
/// whose handle was not released yet.
pub fn terminate_all() {
	let workers = with(mem::take);

	for (id, terminator) in workers {
		terminator.terminate();
		tracing::debug!(worker = %id, "worker terminated");
	}
}
