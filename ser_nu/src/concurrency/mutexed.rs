use std::time::Duration;

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::TimedOut;

/// Value behind a mutex, with optionally time-limited locking.
#[derive(Debug, Default)]
pub struct Mutexed<T> {
	inner: Mutex<T>,
}

impl<T> Mutexed<T> {
	pub fn new(value: T) -> Self {
		Self {
			inner: Mutex::new(value),
		}
	}

	/// Block until the lock is acquired.
	#[inline]
	pub fn lock(&self) -> MutexGuard<'_, T> {
		self.inner.lock()
	}

	#[inline]
	pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
		self.inner.try_lock()
	}

	/// Block until the lock is acquired, or `timeout` elapses.
	pub fn lock_timeout(&self, timeout: Duration) -> Result<MutexGuard<'_, T>, TimedOut> {
		self.inner.try_lock_for(timeout).ok_or(TimedOut(timeout))
	}

	#[inline]
	pub fn get_mut(&mut self) -> &mut T {
		self.inner.get_mut()
	}

	#[inline]
	pub fn into_inner(self) -> T {
		self.inner.into_inner()
	}
}

/// Value behind a reader/writer lock. "Write once, read many".
///
/// Any number of readers can hold the lock at once, but a writer excludes
/// everyone else.
#[derive(Debug, Default)]
pub struct WormMutexed<T> {
	inner: RwLock<T>,
}

impl<T> WormMutexed<T> {
	pub fn new(value: T) -> Self {
		Self {
			inner: RwLock::new(value),
		}
	}

	#[inline]
	pub fn read(&self) -> RwLockReadGuard<'_, T> {
		self.inner.read()
	}

	#[inline]
	pub fn write(&self) -> RwLockWriteGuard<'_, T> {
		self.inner.write()
	}

	pub fn read_timeout(&self, timeout: Duration) -> Result<RwLockReadGuard<'_, T>, TimedOut> {
		self.inner.try_read_for(timeout).ok_or(TimedOut(timeout))
	}

	pub fn write_timeout(&self, timeout: Duration) -> Result<RwLockWriteGuard<'_, T>, TimedOut> {
		self.inner.try_write_for(timeout).ok_or(TimedOut(timeout))
	}

	#[inline]
	pub fn get_mut(&mut self) -> &mut T {
		self.inner.get_mut()
	}

	#[inline]
	pub fn into_inner(self) -> T {
		self.inner.into_inner()
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread};

	use super::*;

	#[test]
	fn lock_timeout_expires_while_held() {
		let mutexed = Arc::new(Mutexed::new(1u32));
		let guard = mutexed.lock();

		let other = Arc::clone(&mutexed);
		let result = thread::spawn(move || other.lock_timeout(Duration::from_millis(20)).map(|v| *v))
			.join()
			.unwrap();
		assert_eq!(result, Err(TimedOut(Duration::from_millis(20))));

		drop(guard);
		assert_eq!(*mutexed.lock_timeout(Duration::from_millis(20)).unwrap(), 1);
	}

	#[test]
	fn readers_share_writers_exclude() {
		let worm = WormMutexed::new(vec![1u8]);
		{
			let a = worm.read();
			let b = worm.read_timeout(Duration::from_millis(10)).unwrap();
			assert_eq!(*a, *b);
			assert!(worm.write_timeout(Duration::from_millis(10)).is_err());
		}
		worm.write().push(2);
		assert_eq!(worm.into_inner(), vec![1, 2]);
	}
}
