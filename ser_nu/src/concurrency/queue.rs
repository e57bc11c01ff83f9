use std::collections::VecDeque;

use tracing::trace;

use super::{Cancellable, Provider, WormMutexed};

/// FIFO queue shared between threads, whose consumers can wait for items.
///
/// [`pop`](ConcurrentQueue::pop) always returns immediately, with a
/// [`Cancellable`] which is either already provided with the front item, or
/// will be provided by a later [`push`](ConcurrentQueue::push). Waiting
/// consumers are served in the order they called `pop`.
///
/// A consumer which stops waiting can cancel its cancellable (e.g. with
/// [`take_or_cancel_timeout`](Cancellable::take_or_cancel_timeout)) or just
/// drop it. An item is never handed to a cancelled or dropped consumer, so
/// items are not lost.
#[derive(Debug)]
pub struct ConcurrentQueue<T> {
	state: WormMutexed<QueueState<T>>,
}

#[derive(Debug)]
struct QueueState<T> {
	items: VecDeque<T>,
	waiting: VecDeque<Provider<T>>,
}

impl<T> ConcurrentQueue<T> {
	pub fn new() -> Self {
		Self {
			state: WormMutexed::new(QueueState {
				items: VecDeque::new(),
				waiting: VecDeque::new(),
			}),
		}
	}

	/// Add an item to the back of the queue, or hand it straight to the
	/// longest-waiting consumer.
	pub fn push(&self, item: T) {
		let mut state = self.state.write();
		let mut item = item;
		while let Some(waiter) = state.waiting.pop_front() {
			// Consumer dropped its handle
			if !waiter.has_consumers() {
				continue;
			}
			match waiter.try_provide(item) {
				Ok(()) => {
					// Last handle may have been dropped since the check
					if waiter.has_consumers() {
						trace!("item handed to waiting consumer");
						return;
					}
					match waiter.reclaim() {
						Some(returned) => item = returned,
						None => return,
					}
				}
				// Consumer gave up
				Err(returned) => item = returned,
			}
		}
		state.items.push_back(item);
	}

	/// Get the front item, or wait for one to be pushed.
	pub fn pop(&self) -> Cancellable<T> {
		let provider = Provider::new();
		let consumer = provider.consumer();

		let mut state = self.state.write();
		match state.items.pop_front() {
			Some(item) => {
				provider.provide(item);
			}
			None => {
				state.waiting.retain(|waiter| !waiter.is_final() && waiter.has_consumers());
				state.waiting.push_back(provider);
				trace!(waiting = state.waiting.len(), "consumer waiting for item");
			}
		}
		consumer
	}

	/// Get the front item if there is one, without waiting.
	pub fn try_pop(&self) -> Option<T> {
		self.state.write().items.pop_front()
	}

	/// Number of items in the queue.
	pub fn len(&self) -> usize {
		self.state.read().items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<T> Default for ConcurrentQueue<T> {
	fn default() -> Self {
		Self::new()
	}
}
