//! Allocate workers with a fixed stack size and post functions to them.
//!
//! A [`Worker`] is an independently scheduled execution context with its own
//! stack. Functions [posted](Worker::post()) to it run there one after the
//! other, in posting order, without the caller waiting for them.
//!
//! ```
//! let worker = wasm_worker::malloc(1024)?;
//! worker.post(|| {
//! 	// Runs on the worker.
//! 	wasm_worker::report_result(0);
//! });
//! # Ok::<(), wasm_worker::AllocError>(())
//! ```
//!
//! # Platforms
//!
//! - On targets with `std` threads every worker is an OS thread.
//! - On `wasm32-unknown-unknown` every worker is a Web Worker sharing the
//!   module's memory. This requires the `atomics` target feature and a
//!   [cross-origin isolated] page. Without them [`malloc()`] returns
//!   [`AllocError::Unsupported`], see [`has_spawn_support()`].
//!
//! # Releasing workers
//!
//! Dropping a [`Worker`] [releases](Worker::release()) it: functions already
//! posted still run, afterwards the worker exits. Nothing keeps the process
//! alive for them though; on native targets use [`Worker::join()`] if the
//! program must not exit before they ran. [`Worker::detach()`] gives up the
//! handle without releasing the worker, which then only stops with the
//! process or [`terminate_all()`].
//!
//! # Reporting results
//!
//! A posted function can signal a result code with [`report_result()`]. It
//! reaches the [`Reporter`] injected with [`WorkerBuilder::reporter()`] and
//! does nothing when none was injected.
//!
//! [cross-origin isolated]: https://developer.mozilla.org/en-US/docs/Web/API/crossOriginIsolated

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod context;
mod error;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod js;
pub mod launcher;
#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
mod native;
mod registry;
mod report;
mod support;
#[cfg(all(
	target_family = "wasm",
	target_os = "unknown",
	not(target_feature = "atomics")
))]
mod unsupported;
#[cfg(all(target_family = "wasm", target_os = "unknown", target_feature = "atomics"))]
mod web;
mod worker;

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use self::native as r#impl;
#[cfg(all(
	target_family = "wasm",
	target_os = "unknown",
	not(target_feature = "atomics")
))]
use self::unsupported as r#impl;
#[cfg(all(target_family = "wasm", target_os = "unknown", target_feature = "atomics"))]
use self::web as r#impl;

pub use self::context::{is_worker, self_id};
pub use self::error::AllocError;
pub use self::registry::terminate_all;
pub use self::report::{report_result, Reporter};
pub use self::support::{hardware_concurrency, has_spawn_support};
pub use self::worker::{malloc, Worker, WorkerBuilder, WorkerId};
