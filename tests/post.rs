//! Posting functions to workers.

#![cfg(any(not(target_family = "wasm"), target_feature = "atomics"))]

mod util;

use std::hint;

#[cfg(target_family = "wasm")]
use wasm_bindgen_test::wasm_bindgen_test;

#[cfg(target_family = "wasm")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn post() {
	let (sender, receiver) = util::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(move || util::signal(&sender, ()));

	receiver.recv().await.unwrap();
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn post_twice() {
	let (sender, receiver) = util::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post({
		let sender = sender.clone();
		move || util::signal(&sender, 1)
	});
	worker.post(move || util::signal(&sender, 2));

	assert_eq!(receiver.recv().await.unwrap(), 1);
	assert_eq!(receiver.recv().await.unwrap(), 2);
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn order() {
	let (sender, receiver) = util::channel();

	let worker = wasm_worker::malloc(1024).unwrap();

	for index in 0..100 {
		let sender = sender.clone();
		worker.post(move || util::signal(&sender, index));
	}

	for index in 0..100 {
		assert_eq!(receiver.recv().await.unwrap(), index);
	}
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn self_id() {
	let (sender, receiver) = util::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(move || {
		util::signal(
			&sender,
			(wasm_worker::self_id(), wasm_worker::is_worker()),
		);
	});

	assert_eq!(receiver.recv().await.unwrap(), (Some(worker.id()), true));
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn released() {
	let (sender, receiver) = util::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post({
		let sender = sender.clone();
		move || util::signal(&sender, 1)
	});
	worker.post(move || util::signal(&sender, 2));
	worker.release();

	assert_eq!(receiver.recv().await.unwrap(), 1);
	assert_eq!(receiver.recv().await.unwrap(), 2);
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn separate_workers() {
	let (sender, receiver) = util::channel();

	let first = wasm_worker::malloc(1024).unwrap();
	let second = wasm_worker::malloc(1024).unwrap();

	for worker in [&first, &second] {
		let sender = sender.clone();
		worker.post(move || util::signal(&sender, wasm_worker::self_id()));
	}

	let mut ids = vec![
		receiver.recv().await.unwrap(),
		receiver.recv().await.unwrap(),
	];
	ids.sort();

	let mut expected = vec![Some(first.id()), Some(second.id())];
	expected.sort();

	assert_eq!(ids, expected);
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn detached() {
	let (sender, receiver) = util::channel();

	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(move || util::signal(&sender, 1));
	worker.detach();

	assert_eq!(receiver.recv().await.unwrap(), 1);
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn small_stack() {
	fn recurse(depth: usize) -> usize {
		let buffer = hint::black_box([depth; 64]);

		if depth == 0 {
			0
		} else {
			recurse(depth - 1) + buffer.iter().sum::<usize>() / depth
		}
	}

	let (sender, receiver) = util::channel();

	// Needs far more than the requested stack.
	let worker = wasm_worker::malloc(1024).unwrap();
	worker.post(move || util::signal(&sender, recurse(16)));

	assert_eq!(receiver.recv().await.unwrap(), 64 * 16);
	assert_eq!(worker.stack_size().get(), 1024);
}

#[cfg_attr(not(target_family = "wasm"), pollster::test)]
#[cfg_attr(target_family = "wasm", wasm_bindgen_test)]
async fn release_cycles() {
	// 64 stacks of 64 MiB don't fit into Wasm memory unless released workers
	// give theirs back.
	const STACK_SIZE: usize = 64 * 1024 * 1024;

	let (sender, receiver) = util::channel();

	for index in 0..64 {
		let worker = wasm_worker::malloc(STACK_SIZE).unwrap();
		let sender = sender.clone();
		worker.post(move || util::signal(&sender, index));

		assert_eq!(receiver.recv().await.unwrap(), index);
	}
}
