//! One-shot result shared between a producer and any number of consumers.
//!
//! A [`Provider`] is the only writer. It may post any number of provisional
//! values with [`update`](Provider::update), and then settles the result
//! exactly once, by providing a final value or by cancelling. Consumers
//! ([`Cancellable`]) can wait for either, read or take the value, or cancel
//! the result themselves, e.g. when they give up waiting.

use std::{
	fmt::{self, Display},
	panic::{self, AssertUnwindSafe},
	sync::Arc,
	time::Duration,
};

use thiserror::Error;
use tracing::{debug, trace, warn};

use super::Gate;

/// Lifecycle of a cancellable result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CancellableState {
	/// Nothing provided yet.
	Undecided,
	/// A provisional value has been provided. It may still be replaced or
	/// cancelled.
	PartiallyProvided,
	/// Final value provided.
	Provided,
	/// Cancelled. No value will ever be provided.
	Cancelled,
}

impl CancellableState {
	/// Whether the state can no longer change.
	#[inline]
	pub fn is_final(self) -> bool {
		matches!(self, Self::Provided | Self::Cancelled)
	}
}

/// Why a consumer could not get a final value.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unavailable {
	#[error("result was cancelled")]
	Cancelled,
	#[error("result was already taken")]
	Taken,
}

struct Slot<T> {
	value: Option<T>,
	state: CancellableState,
}

/// State shared by a provider and all its consumers.
///
/// `slot` opens once the result is final, and its lock guards the value.
/// `decided` opens on the first update, or on finalizing if there was none.
struct Shared<T> {
	slot: Gate<Slot<T>>,
	decided: Gate,
}

impl<T> Shared<T> {
	fn new() -> Self {
		Self {
			slot: Gate::new(Slot {
				value: None,
				state: CancellableState::Undecided,
			}),
			decided: Gate::new(()),
		}
	}

	/// Run a producer callback under the slot lock, unless already final.
	///
	/// A value from the callback is stored as final or provisional according to
	/// `finalize`. A callback which fails or panics cancels the result.
	fn produce<E, F>(&self, produce: F, finalize: bool) -> CancellableState
	where
		E: Display,
		F: FnOnce() -> Result<Option<T>, E>,
	{
		let mut outcome = None;
		self.slot.maybe_open(|slot| {
			match panic::catch_unwind(AssertUnwindSafe(produce)) {
				Ok(Ok(Some(value))) => {
					slot.value = Some(value);
					slot.state = if finalize {
						CancellableState::Provided
					} else {
						CancellableState::PartiallyProvided
					};
				}
				Ok(Ok(None)) => {}
				Ok(Err(err)) => {
					warn!(error = %err, "producer failed, cancelling result");
					cancel_slot(slot);
				}
				Err(_) => {
					warn!("producer panicked, cancelling result");
					cancel_slot(slot);
				}
			}
			outcome = Some(slot.state);
			slot.state.is_final()
		});

		let state = outcome.unwrap_or_else(|| self.state());
		if state != CancellableState::Undecided {
			self.decided.open();
		}
		trace!(?state, finalize, "producer ran");
		state
	}

	/// Store a final value. Hands it back if the result is already final.
	fn provide(&self, value: T) -> Result<(), T> {
		let mut value = Some(value);
		self.slot.maybe_open(|slot| {
			slot.value = value.take();
			slot.state = CancellableState::Provided;
			true
		});
		match value {
			Some(value) => Err(value),
			None => {
				self.decided.open();
				trace!("result provided");
				Ok(())
			}
		}
	}

	fn update(&self, value: T) -> bool {
		let updated = self.slot.critical_section(|open, slot| {
			if open {
				return false;
			}
			slot.value = Some(value);
			slot.state = CancellableState::PartiallyProvided;
			true
		});
		if updated {
			self.decided.open();
			trace!("result updated");
		}
		updated
	}

	fn get(&self) -> Option<T>
	where T: Clone {
		self.slot.critical_section(|_, slot| slot.value.clone())
	}

	fn take(&self) -> Option<T> {
		self.slot.critical_section(|_, slot| slot.value.take())
	}

	fn take_final(&self) -> Option<T> {
		self.slot.critical_section(|open, slot| {
			if open {
				slot.value.take()
			} else {
				None
			}
		})
	}
}

/// Cancelling discards any provisional value.
fn cancel_slot<T>(slot: &mut Slot<T>) {
	slot.value = None;
	slot.state = CancellableState::Cancelled;
}

/// Operations which do not touch the value, so are the same for plain and
/// mapped consumers.
trait Control {
	fn state(&self) -> CancellableState;
	fn wait(&self);
	fn wait_timeout(&self, timeout: Duration) -> bool;
	fn wait_final(&self);
	fn wait_final_timeout(&self, timeout: Duration) -> bool;
	fn cancel(&self) -> bool;
	fn cancel_after(&self, timeout: Duration) -> bool;
}

impl<T> Control for Shared<T> {
	fn state(&self) -> CancellableState {
		self.slot.critical_section(|_, slot| slot.state)
	}

	fn wait(&self) {
		self.decided.wait_for_open();
	}

	fn wait_timeout(&self, timeout: Duration) -> bool {
		self.decided.wait_for_open_timeout(timeout)
	}

	fn wait_final(&self) {
		self.slot.wait_for_open();
	}

	fn wait_final_timeout(&self, timeout: Duration) -> bool {
		self.slot.wait_for_open_timeout(timeout)
	}

	fn cancel(&self) -> bool {
		let mut cancelled = false;
		self.slot.maybe_open(|slot| {
			cancel_slot(slot);
			cancelled = true;
			true
		});
		if cancelled {
			self.decided.open();
			trace!("result cancelled");
		}
		cancelled
	}

	fn cancel_after(&self, timeout: Duration) -> bool {
		let in_time = self.slot.open_after(timeout, |slot| {
			cancel_slot(slot);
			debug!(?timeout, "no final result before deadline, cancelling");
		});
		self.decided.open();
		in_time
	}
}

/// Value access for a mapped consumer.
trait MappedSource<T>: Control + Send + Sync {
	fn as_control(&self) -> &dyn Control;
	fn get(&self) -> Option<T>;
	fn take(&self) -> Option<T>;
	fn take_final(&self) -> Option<T>;
}

struct Map<S, F> {
	base: Cancellable<S>,
	transform: F,
	/// Reads the base value without taking it. `None` if `S` is not `Clone`.
	peek: Option<fn(&Cancellable<S>) -> Option<S>>,
}

impl<S, F> Control for Map<S, F> {
	fn state(&self) -> CancellableState {
		self.base.state()
	}

	fn wait(&self) {
		self.base.wait();
	}

	fn wait_timeout(&self, timeout: Duration) -> bool {
		self.base.wait_timeout(timeout)
	}

	fn wait_final(&self) {
		self.base.wait_final();
	}

	fn wait_final_timeout(&self, timeout: Duration) -> bool {
		self.base.wait_final_timeout(timeout)
	}

	fn cancel(&self) -> bool {
		self.base.cancel()
	}

	fn cancel_after(&self, timeout: Duration) -> bool {
		self.base.cancel_after(timeout)
	}
}

impl<S, U, F> MappedSource<U> for Map<S, F>
where
	S: Send,
	F: Fn(S) -> U + Send + Sync,
{
	fn as_control(&self) -> &dyn Control {
		self
	}

	fn get(&self) -> Option<U> {
		let peek = self.peek?;
		peek(&self.base).map(&self.transform)
	}

	fn take(&self) -> Option<U> {
		self.base.try_take().map(&self.transform)
	}

	fn take_final(&self) -> Option<U> {
		self.base.try_take_final().map(&self.transform)
	}
}

/// Producing side of a cancellable result.
///
/// Dropping a provider which has not settled the result cancels it, so
/// consumers are never left waiting on a producer which has gone away.
pub struct Provider<T> {
	shared: Arc<Shared<T>>,
}

impl<T> Provider<T> {
	pub fn new() -> Self {
		Self {
			shared: Arc::new(Shared::new()),
		}
	}

	/// Get a consumer handle for this result.
	pub fn consumer(&self) -> Cancellable<T> {
		Cancellable {
			source: Source::Direct(Arc::clone(&self.shared)),
		}
	}

	/// Provide the final value.
	///
	/// Returns `false` (dropping `value`) if the result was already final.
	#[inline]
	pub fn provide(&self, value: T) -> bool {
		self.shared.provide(value).is_ok()
	}

	/// Provide the final value, or get it back if the result was already final.
	#[inline]
	pub fn try_provide(&self, value: T) -> Result<(), T> {
		self.shared.provide(value)
	}

	/// Provide a provisional value, replacing any previous one.
	///
	/// Returns `false` if the result was already final.
	#[inline]
	pub fn update(&self, value: T) -> bool {
		self.shared.update(value)
	}

	/// Cancel the result. Returns `false` if it was already final.
	#[inline]
	pub fn cancel(&self) -> bool {
		self.shared.cancel()
	}

	/// Run `produce` and provide its value, unless the result is already final.
	///
	/// `produce` runs under the result's lock, so the result cannot be
	/// cancelled while it is running.
	///
	/// * `Ok(Some(value))` provides `value`.
	/// * `Ok(None)` leaves the result as it was.
	/// * `Err(_)` or a panic cancels the result.
	///
	/// Returns the state afterwards.
	pub fn maybe_provide<E, F>(&self, produce: F) -> CancellableState
	where
		E: Display,
		F: FnOnce() -> Result<Option<T>, E>,
	{
		self.shared.produce(produce, true)
	}

	/// As [`maybe_provide`](Provider::maybe_provide), but stores the value as
	/// provisional.
	pub fn maybe_update<E, F>(&self, produce: F) -> CancellableState
	where
		E: Display,
		F: FnOnce() -> Result<Option<T>, E>,
	{
		self.shared.produce(produce, false)
	}

	/// Whether any consumer handle, mapped or not, is still alive.
	#[inline]
	pub(crate) fn has_consumers(&self) -> bool {
		Arc::strong_count(&self.shared) > 1
	}

	/// Take back a provided value, e.g. when its consumers went away.
	#[inline]
	pub(crate) fn reclaim(&self) -> Option<T> {
		self.shared.take()
	}

	#[inline]
	pub fn state(&self) -> CancellableState {
		self.shared.state()
	}

	#[inline]
	pub fn is_cancelled(&self) -> bool {
		self.state() == CancellableState::Cancelled
	}

	#[inline]
	pub fn is_final(&self) -> bool {
		self.state().is_final()
	}
}

impl<T> Default for Provider<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Drop for Provider<T> {
	fn drop(&mut self) {
		if self.shared.cancel() {
			debug!("provider dropped before settling result, cancelled");
		}
	}
}

impl<T> fmt::Debug for Provider<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Provider").field("state", &self.state()).finish()
	}
}

enum Source<T> {
	Direct(Arc<Shared<T>>),
	Mapped(Arc<dyn MappedSource<T>>),
}

/// Consuming side of a cancellable result.
///
/// Cheap to clone. All clones, and all consumers derived with
/// [`map`](Cancellable::map), share the same result.
pub struct Cancellable<T> {
	source: Source<T>,
}

impl<T> Cancellable<T> {
	fn control(&self) -> &dyn Control {
		match &self.source {
			Source::Direct(shared) => &**shared,
			Source::Mapped(mapped) => mapped.as_control(),
		}
	}

	#[inline]
	pub fn state(&self) -> CancellableState {
		self.control().state()
	}

	#[inline]
	pub fn is_cancelled(&self) -> bool {
		self.state() == CancellableState::Cancelled
	}

	#[inline]
	pub fn is_final(&self) -> bool {
		self.state().is_final()
	}

	/// Block until a value (provisional or final) is provided, or the result
	/// is cancelled.
	#[inline]
	pub fn wait(&self) {
		self.control().wait();
	}

	/// As [`wait`](Cancellable::wait), giving up after `timeout`.
	///
	/// Returns `true` if something was decided in time.
	#[inline]
	pub fn wait_timeout(&self, timeout: Duration) -> bool {
		self.control().wait_timeout(timeout)
	}

	/// Block until the result is final.
	#[inline]
	pub fn wait_final(&self) {
		self.control().wait_final();
	}

	/// As [`wait_final`](Cancellable::wait_final), giving up after `timeout`.
	#[inline]
	pub fn wait_final_timeout(&self, timeout: Duration) -> bool {
		self.control().wait_final_timeout(timeout)
	}

	/// Cancel the result. Returns `false` if it was already final.
	#[inline]
	pub fn cancel(&self) -> bool {
		self.control().cancel()
	}

	/// Wait up to `timeout` for the result to become final, then cancel it.
	///
	/// Returns `true` if it became final by itself.
	#[inline]
	pub fn cancel_after(&self, timeout: Duration) -> bool {
		self.control().cancel_after(timeout)
	}

	/// Get a copy of the current value, provisional or final, without waiting.
	pub fn try_get(&self) -> Option<T>
	where T: Clone {
		match &self.source {
			Source::Direct(shared) => shared.get(),
			Source::Mapped(mapped) => mapped.get(),
		}
	}

	/// Remove the current value, provisional or final, without waiting.
	///
	/// State is unchanged, so a later `try_take` returns `None` until the
	/// provider sets a new value.
	pub fn try_take(&self) -> Option<T> {
		match &self.source {
			Source::Direct(shared) => shared.take(),
			Source::Mapped(mapped) => mapped.take(),
		}
	}

	/// Remove the value only if it is final.
	pub fn try_take_final(&self) -> Option<T> {
		match &self.source {
			Source::Direct(shared) => shared.take_final(),
			Source::Mapped(mapped) => mapped.take_final(),
		}
	}

	/// Get the final value, cancelling the result first if it is not final.
	pub fn get_or_cancel(&self) -> Result<T, Unavailable>
	where T: Clone {
		self.cancel();
		self.final_value(self.try_get())
	}

	/// Wait up to `timeout` for the final value, cancelling the result if it
	/// does not arrive in time.
	pub fn get_or_cancel_timeout(&self, timeout: Duration) -> Result<T, Unavailable>
	where T: Clone {
		self.cancel_after(timeout);
		self.final_value(self.try_get())
	}

	/// As [`get_or_cancel_timeout`](Cancellable::get_or_cancel_timeout), but
	/// removes the value.
	pub fn take_or_cancel_timeout(&self, timeout: Duration) -> Result<T, Unavailable> {
		self.cancel_after(timeout);
		self.final_value(self.try_take_final())
	}

	/// Interpret a value read after the result became final.
	fn final_value(&self, value: Option<T>) -> Result<T, Unavailable> {
		match value {
			Some(value) => Ok(value),
			None if self.is_cancelled() => Err(Unavailable::Cancelled),
			None => Err(Unavailable::Taken),
		}
	}

	/// Derive a consumer which applies `transform` to values it retrieves.
	///
	/// The mapped consumer shares this one's state, so cancelling either
	/// cancels both. `transform` runs on each retrieval, never before.
	pub fn map<U, F>(self, transform: F) -> Cancellable<U>
	where
		T: Clone + Send + 'static,
		U: 'static,
		F: Fn(T) -> U + Send + Sync + 'static,
	{
		let peek: fn(&Self) -> Option<T> = Self::try_get;
		self.map_with(transform, Some(peek))
	}

	/// As [`map`](Cancellable::map), for values which cannot be cloned.
	///
	/// The mapped consumer can only take values. `try_get` and
	/// `get_or_cancel*` on it never see one.
	pub fn map_owned<U, F>(self, transform: F) -> Cancellable<U>
	where
		T: Send + 'static,
		U: 'static,
		F: Fn(T) -> U + Send + Sync + 'static,
	{
		self.map_with(transform, None)
	}

	fn map_with<U, F>(
		self,
		transform: F,
		peek: Option<fn(&Cancellable<T>) -> Option<T>>,
	) -> Cancellable<U>
	where
		T: Send + 'static,
		U: 'static,
		F: Fn(T) -> U + Send + Sync + 'static,
	{
		Cancellable {
			source: Source::Mapped(Arc::new(Map {
				base: self,
				transform,
				peek,
			})),
		}
	}
}

impl<T> Clone for Cancellable<T> {
	fn clone(&self) -> Self {
		let source = match &self.source {
			Source::Direct(shared) => Source::Direct(Arc::clone(shared)),
			Source::Mapped(mapped) => Source::Mapped(Arc::clone(mapped)),
		};
		Self { source }
	}
}

impl<T> fmt::Debug for Cancellable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cancellable").field("state", &self.state()).finish()
	}
}
