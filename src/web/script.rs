//! The worker script, served from an object URL so it can import the
//! wasm-bindgen shim the current module was loaded from.

use js_sys::Array;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::js::META;

thread_local! {
	/// Script shared by all workers spawned from this thread. Revoked when
	/// the thread exits.
	static SCRIPT: Script = Script::new();
}

/// Object URL of the worker script.
#[derive(Debug)]
struct Script {
	/// The URL, [`None`] if it couldn't be created.
	url: Option<String>,
}

impl Script {
	/// Puts `worker.js`, prefixed with the shim import, into a [`Blob`].
	fn new() -> Self {
		let source = format!(
			"import {{ initSync, __wasm_worker_entry, __wasm_worker_run }} from '{shim}';\n\n{body}",
			shim = META.url(),
			body = include_str!("worker.js"),
		);

		let mut options = BlobPropertyBag::new();
		options.type_("text/javascript");

		let url = Blob::new_with_str_sequence_and_options(&Array::of1(&source.into()), &options)
			.and_then(|blob| Url::create_object_url_with_blob(&blob));

		match url {
			Ok(url) => Self { url: Some(url) },
			Err(error) => {
				tracing::error!(?error, "worker script could not be created");
				Self { url: None }
			}
		}
	}
}

impl Drop for Script {
	fn drop(&mut self) {
		if let Some(url) = &self.url {
			if let Err(error) = Url::revoke_object_url(url) {
				tracing::warn!(?error, "worker script URL could not be revoked");
			}
		}
	}
}

/// Runs `task` with the object URL of the worker script, or [`None`] if it
/// couldn't be created.
pub(super) fn with_url<R>(task: impl FnOnce(Option<&str>) -> R) -> R {
	SCRIPT.with(|script| task(script.url.as_deref()))
}
