use std::{sync::Arc, thread, time::Duration};

use ser_nu::{
	concurrency::{ConcurrentQueue, Unavailable},
	CancellableState,
};

const SHORT: Duration = Duration::from_millis(20);
const LONG: Duration = Duration::from_secs(5);

#[test]
fn push_then_pop() {
	let queue = ConcurrentQueue::new();
	queue.push(1);

	let popped = queue.pop();
	assert_eq!(popped.state(), CancellableState::Provided);
	assert_eq!(popped.try_take(), Some(1));
	assert!(queue.is_empty());
}

#[test]
fn items_come_out_in_order() {
	let queue = ConcurrentQueue::new();
	queue.push(69);
	queue.push(420);
	assert_eq!(queue.len(), 2);

	assert_eq!(queue.pop().take_or_cancel_timeout(SHORT), Ok(69));
	assert_eq!(queue.pop().take_or_cancel_timeout(SHORT), Ok(420));
	assert_eq!(queue.len(), 0);
}

#[test]
fn pop_on_empty_queue_waits_for_push() {
	let queue = ConcurrentQueue::new();
	let popped = queue.pop();
	assert!(!popped.wait_timeout(SHORT));
	assert_eq!(popped.state(), CancellableState::Undecided);

	queue.push("foo");
	assert_eq!(popped.try_take(), Some("foo"));
	// Went straight to the waiter
	assert!(queue.is_empty());
}

#[test]
fn waiters_are_served_in_order() {
	let queue = ConcurrentQueue::new();
	let first = queue.pop();
	let second = queue.pop();

	queue.push(1);
	queue.push(2);
	queue.push(3);

	assert_eq!(first.try_take(), Some(1));
	assert_eq!(second.try_take(), Some(2));
	assert_eq!(queue.try_pop(), Some(3));
	assert_eq!(queue.try_pop(), None);
}

#[test]
fn cancelled_waiter_does_not_lose_item() {
	let queue = ConcurrentQueue::new();
	let gave_up = queue.pop();
	assert_eq!(gave_up.take_or_cancel_timeout(SHORT), Err(Unavailable::Cancelled));
	let still_waiting = queue.pop();

	queue.push(7);
	assert_eq!(still_waiting.try_take(), Some(7));
	assert_eq!(gave_up.try_take(), None);

	// With nobody waiting, the item stays queued
	let gave_up = queue.pop();
	gave_up.cancel();
	queue.push(8);
	assert_eq!(queue.len(), 1);
	assert_eq!(queue.pop().try_take(), Some(8));
}

#[test]
fn dropped_waiter_does_not_lose_item() {
	let queue = ConcurrentQueue::new();
	drop(queue.pop());
	queue.push(7u32);
	assert_eq!(queue.len(), 1);
	assert_eq!(queue.pop().try_take(), Some(7));

	// Skipped in favour of a later waiter still holding its handle
	drop(queue.pop());
	let kept = queue.pop();
	let mapped = queue.pop().map(|n| n * 10);
	queue.push(8);
	queue.push(9);
	assert_eq!(kept.try_take(), Some(8));
	assert_eq!(mapped.try_take(), Some(90));
	assert!(queue.is_empty());
}

#[test]
fn items_cross_threads() {
	const PRODUCERS: usize = 4;
	const PER_PRODUCER: usize = 50;

	let queue = Arc::new(ConcurrentQueue::new());

	let consumer = {
		let queue = Arc::clone(&queue);
		thread::spawn(move || {
			let mut received = (0..PRODUCERS * PER_PRODUCER)
				.map(|_| queue.pop().take_or_cancel_timeout(LONG).unwrap())
				.collect::<Vec<_>>();
			received.sort_unstable();
			received
		})
	};

	let producers = (0..PRODUCERS)
		.map(|producer| {
			let queue = Arc::clone(&queue);
			thread::spawn(move || {
				for index in 0..PER_PRODUCER {
					queue.push(producer * PER_PRODUCER + index);
				}
			})
		})
		.collect::<Vec<_>>();
	for producer in producers {
		producer.join().unwrap();
	}

	assert_eq!(
		consumer.join().unwrap(),
		(0..PRODUCERS * PER_PRODUCER).collect::<Vec<_>>()
	);
	assert!(queue.is_empty());
}
