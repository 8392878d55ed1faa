//! Releasing, joining and terminating workers on native targets.

#![cfg(not(target_family = "wasm"))]

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use wasm_worker::WorkerBuilder;

#[test]
fn join() {
	let values = Arc::new(Mutex::new(Vec::new()));

	let worker = wasm_worker::malloc(1024).unwrap();

	for index in 0..3 {
		let values = Arc::clone(&values);
		worker.post(move || values.lock().unwrap().push(index));
	}

	worker.join().unwrap();

	assert_eq!(*values.lock().unwrap(), [0, 1, 2]);
}

#[test]
fn drop_runs_queue() {
	let (sender, receiver) = mpsc::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(move || sender.send(()).unwrap());
	drop(worker);

	receiver.recv().unwrap();
}

#[test]
fn terminate() {
	let (started_sender, started) = mpsc::channel();
	let (gate_sender, gate) = mpsc::channel::<()>();
	let (finished_sender, finished) = mpsc::channel();
	let (discarded_sender, discarded) = mpsc::channel::<()>();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(move || {
		started_sender.send(()).unwrap();
		gate.recv().unwrap();
		finished_sender.send(()).unwrap();
	});
	worker.post(move || discarded_sender.send(()).unwrap());

	started.recv().unwrap();
	worker.terminate();
	gate_sender.send(()).unwrap();

	// The running function completes, the queued one is dropped unrun.
	finished.recv().unwrap();
	assert!(discarded.recv().is_err());
}

#[test]
fn panic() {
	let (sender, receiver) = mpsc::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(|| panic!("test"));
	worker.post(move || sender.send(()).unwrap());

	receiver.recv().unwrap();
	worker.join().unwrap();
}

#[test]
fn thread_name() {
	let (sender, receiver) = mpsc::channel();

	let worker = WorkerBuilder::new(1024)
		.name(String::from("test"))
		.spawn()
		.unwrap();
	worker.post(move || {
		sender
			.send(thread::current().name().map(str::to_owned))
			.unwrap();
	});

	assert_eq!(receiver.recv().unwrap().as_deref(), Some("test"));
}

#[test]
fn post_from_worker() {
	let (sender, receiver) = mpsc::channel();

	let inner = wasm_worker::malloc(1024).unwrap();
	let inner_id = inner.id();
	let outer = wasm_worker::malloc(1024).unwrap();

	outer.post(move || {
		inner.post(move || sender.send(wasm_worker::self_id()).unwrap());
		inner.join().unwrap();
	});

	assert_eq!(receiver.recv().unwrap(), Some(inner_id));
	outer.join().unwrap();
}

#[test]
fn deep_stack() {
	fn recurse(depth: usize) -> usize {
		let buffer = [depth; 64];

		if depth == 0 {
			buffer.iter().sum()
		} else {
			recurse(depth - 1) + buffer.len()
		}
	}

	let (sender, receiver) = mpsc::channel();

	let worker = wasm_worker::malloc(4 * 1024 * 1024).unwrap();
	worker.post(move || sender.send(recurse(1000)).unwrap());

	assert_eq!(receiver.recv().unwrap(), 64 * 1000);
	worker.join().unwrap();
}
