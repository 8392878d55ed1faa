//! Shared test helpers.

#![allow(dead_code, unreachable_pub)]

use async_channel::{Receiver, Sender};

/// Creates an unbounded channel to get signals back from workers.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
	async_channel::unbounded()
}

/// Sends `value` from a worker. Never blocks.
pub fn signal<T>(sender: &Sender<T>, value: T) {
	sender
		.try_send(value)
		.unwrap_or_else(|_| panic!("test receiver dropped"));
}

/// Builds a reporter forwarding every reported code to `sender`.
pub fn reporter(sender: Sender<i32>) -> impl Fn(i32) + Send + Sync {
	move |code| signal(&sender, code)
}
