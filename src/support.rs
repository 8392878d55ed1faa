//! Platform capability queries.

use std::num::NonZeroUsize;

use crate::r#impl;

/// Returns `true` if this platform can allocate workers.
///
/// Always `true` on targets with `std` threads. On the Web this requires the
/// `atomics` target feature, a [cross-origin isolated] page and the `Worker`
/// constructor to be available.
///
/// [cross-origin isolated]: https://developer.mozilla.org/en-US/docs/Web/API/crossOriginIsolated
#[must_use]
pub fn has_spawn_support() -> bool {
	r#impl::has_spawn_support()
}

/// Returns the number of logical processors available to run workers in
/// parallel, if the platform reports it.
#[must_use]
pub fn hardware_concurrency() -> Option<NonZeroUsize> {
	#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
	{
		r#impl::hardware_concurrency()
	}
	#[cfg(all(target_family = "wasm", target_os = "unknown"))]
	{
		web_hardware_concurrency()
	}
}

/// Reads `navigator.hardwareConcurrency` in a window or a worker.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
fn web_hardware_concurrency() -> Option<NonZeroUsize> {
	use wasm_bindgen::JsCast;
	use web_sys::{Window, WorkerGlobalScope};

	use crate::js::GlobalExt;

	let global: GlobalExt = js_sys::global().unchecked_into();

	let concurrency = if !global.window().is_undefined() {
		global.unchecked_into::<Window>().navigator().hardware_concurrency()
	} else if !global.worker_global_scope().is_undefined() {
		global
			.unchecked_into::<WorkerGlobalScope>()
			.navigator()
			.hardware_concurrency()
	} else {
		return None;
	};

	#[allow(
		clippy::as_conversions,
		clippy::cast_possible_truncation,
		clippy::cast_sign_loss
	)]
	let concurrency = concurrency as usize;
	NonZeroUsize::new(concurrency)
}
