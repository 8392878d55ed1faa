//! Implementation on targets with `std` threads.

use std::any::Any;
use std::iter;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::context::Context;
use crate::worker::{Task, MIN_STACK_SIZE};
use crate::{registry, AllocError, WorkerId};

/// Message sent to the worker thread.
enum Message {
	/// Run a posted function.
	Task(Task),
	/// Stop after the messages in front of this one.
	Close,
}

/// Implementation of [`Worker`](crate::Worker).
#[derive(Debug)]
pub(crate) struct Worker {
	/// Queue of the worker thread.
	sender: Sender<Message>,
	/// Set when the worker has to discard all remaining messages.
	terminated: Arc<AtomicBool>,
	/// Worker thread, [`None`] after [`Worker::join()`].
	thread: Option<JoinHandle<()>>,
	/// If [`Message::Close`] was already sent.
	released: bool,
}

/// Stops a worker from outside its handle.
#[derive(Debug)]
pub(crate) struct Terminator {
	/// Queue of the worker thread.
	sender: Sender<Message>,
	/// See [`Worker::terminated`].
	terminated: Arc<AtomicBool>,
}

impl Worker {
	/// Spawns the worker thread.
	pub(crate) fn spawn(
		context: Context,
		stack_size: NonZeroUsize,
		name: Option<&str>,
	) -> Result<(Self, Terminator), AllocError> {
		let (sender, receiver) = mpsc::channel();
		let terminated = Arc::new(AtomicBool::new(false));

		let mut builder = thread::Builder::new().stack_size(stack_size.get().max(MIN_STACK_SIZE));

		if let Some(name) = name {
			builder = builder.name(name.to_owned());
		}

		let thread = builder
			.spawn({
				let terminated = Arc::clone(&terminated);
				move || run(context, &receiver, &terminated)
			})
			.map_err(|error| AllocError::Spawn(error.to_string()))?;

		let terminator = Terminator {
			sender: sender.clone(),
			terminated: Arc::clone(&terminated),
		};

		Ok((
			Self {
				sender,
				terminated,
				thread: Some(thread),
				released: false,
			},
			terminator,
		))
	}

	/// Implementation of [`Worker::post()`](crate::Worker::post()).
	pub(crate) fn post(&self, id: WorkerId, task: Task) {
		if self.terminated.load(Ordering::Acquire) || self.sender.send(Message::Task(task)).is_err()
		{
			tracing::warn!(worker = %id, "worker already stopped, posted function dropped");
		}
	}

	/// Implementation of [`Worker::release()`](crate::Worker::release()).
	pub(crate) fn release(&mut self) {
		if !self.released {
			self.released = true;
			// The thread might already be gone after `terminate_all()`.
			let _ = self.sender.send(Message::Close);
		}
	}

	/// Implementation of [`Worker::detach()`](crate::Worker::detach()).
	///
	/// The thread keeps running, as the [`Terminator`] in the registry holds
	/// on to the queue.
	pub(crate) fn detach(&mut self) {
		self.released = true;
		self.thread = None;
	}

	/// Implementation of [`Worker::terminate()`](crate::Worker::terminate()).
	pub(crate) fn terminate(&mut self) {
		self.released = true;
		terminate(&self.terminated, &self.sender);
	}

	/// Implementation of [`Worker::join()`](crate::Worker::join()).
	pub(crate) fn join(&mut self) -> thread::Result<()> {
		self.thread.take().map_or(Ok(()), JoinHandle::join)
	}
}

impl Terminator {
	/// Terminates the worker.
	pub(crate) fn terminate(&self) {
		terminate(&self.terminated, &self.sender);
	}
}

/// Flags the worker as terminated and wakes it up if it's idle.
fn terminate(terminated: &AtomicBool, sender: &Sender<Message>) {
	terminated.store(true, Ordering::Release);
	let _ = sender.send(Message::Close);
}

/// Event loop of the worker thread.
fn run(context: Context, receiver: &Receiver<Message>, terminated: &AtomicBool) {
	let id = context.id();
	context.enter();
	tracing::debug!(worker = %id, "worker started");

	while let Ok(message) = receiver.recv() {
		if terminated.load(Ordering::Acquire) {
			let discarded = discard(message, receiver);

			if discarded != 0 {
				tracing::warn!(worker = %id, discarded, "worker terminated, posted functions dropped");
			}

			break;
		}

		match message {
			Message::Task(task) => {
				if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
					tracing::error!(
						worker = %id,
						panic = panic_message(payload.as_ref()),
						"posted function panicked"
					);
				}
			}
			Message::Close => break,
		}
	}

	registry::unregister(id);
	tracing::debug!(worker = %id, "worker finished");
}

/// Drops `message` and everything still queued. Returns the number of
/// functions that never ran.
fn discard(message: Message, receiver: &Receiver<Message>) -> usize {
	iter::once(message)
		.chain(receiver.try_iter())
		.filter(|message| matches!(message, Message::Task(_)))
		.count()
}

/// Extracts the message of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message
	} else {
		"<non-string payload>"
	}
}

/// Implementation of [`has_spawn_support()`](crate::has_spawn_support()).
pub(crate) const fn has_spawn_support() -> bool {
	true
}

/// Implementation of
/// [`hardware_concurrency()`](crate::hardware_concurrency()).
pub(crate) fn hardware_concurrency() -> Option<NonZeroUsize> {
	thread::available_parallelism().ok()
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc;

	use super::{discard, Message};

	#[test]
	fn discard_counts_tasks() {
		let (sender, receiver) = mpsc::channel();
		sender.send(Message::Close).unwrap();
		sender.send(Message::Task(Box::new(|| ()))).unwrap();
		sender.send(Message::Task(Box::new(|| ()))).unwrap();

		assert_eq!(
			discard(Message::Task(Box::new(|| ())), &receiver),
			3,
			"queued functions not counted"
		);
		assert!(receiver.try_recv().is_err(), "queue not drained");
	}

	#[test]
	fn discard_close_only() {
		let (_sender, receiver) = mpsc::channel();

		assert_eq!(discard(Message::Close, &receiver), 0, "close counted as function");
	}
}
