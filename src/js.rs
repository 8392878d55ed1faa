//! Bindings to the JS API.

#[cfg(target_feature = "atomics")]
use js_sys::{Object, WebAssembly::Global};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsValue;

#[wasm_bindgen]
extern "C" {
	/// Global object of any JS context.
	pub(crate) type GlobalExt;

	/// Returns the `Window` constructor, `undefined` outside a window.
	#[wasm_bindgen(method, getter, js_name = Window)]
	pub(crate) fn window(this: &GlobalExt) -> JsValue;

	/// Returns the `WorkerGlobalScope` constructor, `undefined` outside a
	/// worker.
	#[wasm_bindgen(method, getter, js_name = WorkerGlobalScope)]
	pub(crate) fn worker_global_scope(this: &GlobalExt) -> JsValue;

	/// Returns the `Worker` constructor, `undefined` where workers can't be
	/// spawned.
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(method, getter, js_name = Worker)]
	pub(crate) fn worker(this: &GlobalExt) -> JsValue;

	/// [`crossOriginIsolated`](https://developer.mozilla.org/en-US/docs/Web/API/crossOriginIsolated).
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(js_name = crossOriginIsolated)]
	pub(crate) static CROSS_ORIGIN_ISOLATED: bool;

	/// `import.meta`.
	#[cfg(target_feature = "atomics")]
	pub(crate) type Meta;

	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(js_namespace = import, js_name = meta)]
	pub(crate) static META: Meta;

	/// URL of the wasm-bindgen JS shim.
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(method, getter)]
	pub(crate) fn url(this: &Meta) -> String;

	/// Exports of the Wasm module.
	#[cfg(target_feature = "atomics")]
	pub(crate) type Exports;

	/// Frees the TLS block and stack of a thread that doesn't run anymore.
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(method, js_name = __wbindgen_thread_destroy)]
	pub(crate) unsafe fn thread_destroy(this: &Exports, tls_base: &Global, stack_alloc: &Global);

	/// Base address of the calling thread's TLS block.
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(method, getter, js_name = __tls_base)]
	pub(crate) fn tls_base(this: &Exports) -> Global;

	/// Address of the calling thread's stack allocation.
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(method, getter, js_name = __stack_alloc)]
	pub(crate) fn stack_alloc(this: &Exports) -> Global;

	/// Descriptor passed to `new WebAssembly.Global()`.
	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(extends = Object)]
	pub(crate) type GlobalDescriptor;

	#[cfg(target_feature = "atomics")]
	#[wasm_bindgen(method, setter, js_name = value)]
	pub(crate) fn set_value(this: &GlobalDescriptor, value: &str);
}
