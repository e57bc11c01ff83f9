use std::time::{Duration, Instant};

use parking_lot::{Condvar, MutexGuard};

use super::Mutexed;

/// A flag which can be opened once, and never closed again.
///
/// The flag shares its mutex with a payload of type `T`, so code which
/// decides whether to open the gate can inspect and update the payload
/// atomically with that decision. Threads can block until the gate opens.
#[derive(Debug, Default)]
pub struct Gate<T = ()> {
	state: Mutexed<GateState<T>>,
	on_open: Condvar,
}

#[derive(Debug, Default)]
struct GateState<T> {
	open: bool,
	value: T,
}

impl<T> Gate<T> {
	/// Create a closed gate guarding `value`.
	pub fn new(value: T) -> Self {
		Self {
			state: Mutexed::new(GateState { open: false, value }),
			on_open: Condvar::new(),
		}
	}

	#[inline]
	pub fn is_open(&self) -> bool {
		self.state.lock().open
	}

	/// Open the gate.
	///
	/// Returns `true` if this call opened it, `false` if it was already open.
	pub fn open(&self) -> bool {
		let mut state = self.state.lock();
		self.open_locked(&mut state)
	}

	/// Call `decide` with the payload, and open the gate if it returns `true`.
	///
	/// `decide` is not called if the gate is already open. Check and update
	/// happen under one lock, so no other thread can open the gate in between.
	///
	/// Returns whether the gate is open afterwards, not whether `decide` was
	/// called.
	pub fn maybe_open<F: FnOnce(&mut T) -> bool>(&self, decide: F) -> bool {
		self.maybe_open_or(decide, |_| {})
	}

	/// As [`maybe_open`](Gate::maybe_open), but calls `already_open` instead of
	/// `decide` if the gate is already open.
	pub fn maybe_open_or<F, A>(&self, decide: F, already_open: A) -> bool
	where
		F: FnOnce(&mut T) -> bool,
		A: FnOnce(&mut T),
	{
		let mut state = self.state.lock();
		if state.open {
			already_open(&mut state.value);
		} else if decide(&mut state.value) {
			self.open_locked(&mut state);
		}
		state.open
	}

	/// Run `f` with the payload, while the gate cannot change state.
	///
	/// `f` is told whether the gate is open.
	pub fn critical_section<R, F: FnOnce(bool, &mut T) -> R>(&self, f: F) -> R {
		let mut state = self.state.lock();
		let GateState { open, value } = &mut *state;
		f(*open, value)
	}

	/// Block until the gate opens.
	pub fn wait_for_open(&self) {
		let mut state = self.state.lock();
		while !state.open {
			self.on_open.wait(&mut state);
		}
	}

	/// Block until the gate opens, or `timeout` elapses.
	///
	/// Returns `true` if the gate is open.
	pub fn wait_for_open_timeout(&self, timeout: Duration) -> bool {
		let mut state = self.state.lock();
		self.wait_locked(&mut state, timeout)
	}

	/// Wait up to `timeout` for the gate to open, then force it open.
	///
	/// If it has to be forced, `on_force` is called with the payload under the
	/// same lock which opens the gate, so waiters woken by the opening observe
	/// its changes.
	///
	/// Returns `true` if the gate opened by itself, `false` if it was forced.
	pub fn open_after<F: FnOnce(&mut T)>(&self, timeout: Duration, on_force: F) -> bool {
		let mut state = self.state.lock();
		if self.wait_locked(&mut state, timeout) {
			return true;
		}
		on_force(&mut state.value);
		self.open_locked(&mut state);
		false
	}

	fn open_locked(&self, state: &mut MutexGuard<'_, GateState<T>>) -> bool {
		if state.open {
			return false;
		}
		state.open = true;
		self.on_open.notify_all();
		true
	}

	fn wait_locked(&self, state: &mut MutexGuard<'_, GateState<T>>, timeout: Duration) -> bool {
		// A timeout too long to represent as an `Instant` is as good as forever
		let Some(deadline) = Instant::now().checked_add(timeout) else {
			while !state.open {
				self.on_open.wait(state);
			}
			return true;
		};

		while !state.open {
			if self.on_open.wait_until(state, deadline).timed_out() {
				break;
			}
		}
		state.open
	}
}
