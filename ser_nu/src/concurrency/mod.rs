//! Blocking, thread-based synchronization.
//!
//! [`Gate`] is a flag which can only go from closed to open, guarding a
//! payload. [`Provider`] / [`Cancellable`] build a one-shot result on top of
//! it, and [`ConcurrentQueue`] hands out its items as cancellables.

use std::time::Duration;

use thiserror::Error;

mod cancellable;
pub use cancellable::{Cancellable, CancellableState, Provider, Unavailable};

mod gate;
pub use gate::Gate;

mod mutexed;
pub use mutexed::{Mutexed, WormMutexed};

mod queue;
pub use queue::ConcurrentQueue;

/// A lock could not be acquired within the allowed time.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("timed out after {0:?}")]
pub struct TimedOut(pub Duration);
