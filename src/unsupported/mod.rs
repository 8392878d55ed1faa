//! Implementation on the Web without the atomics target feature enabled.
//!
//! Workers can't share memory with the module that spawned them, so
//! allocation always fails.

use std::num::NonZeroUsize;

use crate::context::Context;
use crate::worker::Task;
use crate::{AllocError, WorkerId};

/// Implementation of [`Worker`](crate::Worker). Can't be constructed.
#[derive(Debug)]
pub(crate) enum Worker {}

/// Stops a worker from outside its handle. Can't be constructed.
#[derive(Debug)]
pub(crate) enum Terminator {}

impl Worker {
	/// Always fails with [`AllocError::Unsupported`].
	pub(crate) fn spawn(
		_: Context,
		_: NonZeroUsize,
		_: Option<&str>,
	) -> Result<(Self, Terminator), AllocError> {
		Err(AllocError::Unsupported)
	}

	/// Implementation of [`Worker::post()`](crate::Worker::post()).
	pub(crate) fn post(&self, _: WorkerId, _: Task) {
		match *self {}
	}

	/// Implementation of [`Worker::release()`](crate::Worker::release()).
	pub(crate) fn release(&mut self) {
		match *self {}
	}

	/// Implementation of [`Worker::detach()`](crate::Worker::detach()).
	pub(crate) fn detach(&mut self) {
		match *self {}
	}

	/// Implementation of [`Worker::terminate()`](crate::Worker::terminate()).
	pub(crate) fn terminate(&mut self) {
		match *self {}
	}
}

impl Terminator {
	/// Terminates the worker.
	pub(crate) fn terminate(&self) {
		match *self {}
	}
}

/// Implementation of [`has_spawn_support()`](crate::has_spawn_support()).
pub(crate) const fn has_spawn_support() -> bool {
	false
}
