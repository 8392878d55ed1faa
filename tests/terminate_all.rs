//! Terminating all workers at once. Kept in its own test binary, as it
//! affects every worker of the process.

#![cfg(any(not(target_family = "wasm"), target_feature = "atomics"))]

#[cfg(target_family = "wasm")]
mod util;

#[cfg(not(target_family = "wasm"))]
use std::sync::mpsc;

#[cfg(target_family = "wasm")]
use wasm_bindgen_test::wasm_bindgen_test;

#[cfg(target_family = "wasm")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[test]
#[cfg(not(target_family = "wasm"))]
fn terminate_all() {
	let (started_sender, started) = mpsc::channel();
	let (gate_sender, gate) = mpsc::channel::<()>();
	let (discarded_sender, discarded) = mpsc::channel::<()>();
	let (late_sender, late) = mpsc::channel::<()>();
	let (detached_started_sender, detached_started) = mpsc::channel();
	let (detached_gate_sender, detached_gate) = mpsc::channel::<()>();
	let (detached_discarded_sender, detached_discarded) = mpsc::channel::<()>();

	let idle = wasm_worker::malloc(1024).unwrap();
	let busy = wasm_worker::malloc(1024).unwrap();
	let detached = wasm_worker::malloc(1024).unwrap();

	busy.post(move || {
		started_sender.send(()).unwrap();
		gate.recv().unwrap();
	});
	busy.post(move || discarded_sender.send(()).unwrap());

	detached.post(move || {
		detached_started_sender.send(()).unwrap();
		detached_gate.recv().unwrap();
	});
	detached.post(move || detached_discarded_sender.send(()).unwrap());
	detached.detach();

	started.recv().unwrap();
	detached_started.recv().unwrap();
	wasm_worker::terminate_all();
	gate_sender.send(()).unwrap();
	detached_gate_sender.send(()).unwrap();

	assert!(discarded.recv().is_err());
	assert!(detached_discarded.recv().is_err());

	idle.post(move || late_sender.send(()).unwrap());
	assert!(late.recv().is_err());

	idle.join().unwrap();
	busy.join().unwrap();
}

#[wasm_bindgen_test]
#[cfg(target_family = "wasm")]
async fn terminate_all() {
	let (sender, receiver) = util::channel();

	let terminated = wasm_worker::malloc(1024).unwrap();
	let detached = wasm_worker::malloc(1024).unwrap();
	detached.detach();

	wasm_worker::terminate_all();

	// Dropped without reaching the worker.
	terminated.post({
		let sender = sender.clone();
		move || util::signal(&sender, 1)
	});

	let fresh = wasm_worker::malloc(1024).unwrap();
	fresh.post(move || util::signal(&sender, 2));

	assert_eq!(receiver.recv().await.unwrap(), 2);
	assert!(receiver.try_recv().is_err());
}
