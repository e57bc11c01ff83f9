//! Buffer types.
//!
//! [`Data`] is the owning buffer every serialization produces.
//! [`DataRef`] and [`DataMut`] are windows onto a buffer which remember their
//! offset from the start of the original buffer, so bounds failures can report
//! exactly where they happened. All slicing on views is checked and fails with
//! [`Error::BufferOverrun`] rather than panicking.

use std::mem;

use crate::{Error, Result, StaticallySized};

/// Owning byte buffer. Output of serialization.
pub type Data = Vec<u8>;

/// Immutable view onto a byte buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataRef<'a> {
	bytes: &'a [u8],
	offset: usize,
}

impl<'a> DataRef<'a> {
	/// Create a view over the whole of `bytes`.
	#[inline]
	pub const fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, offset: 0 }
	}

	/// Number of bytes in view.
	#[inline]
	pub const fn len(&self) -> usize {
		self.bytes.len()
	}

	#[inline]
	pub const fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Position of the start of this view in the buffer it was created from.
	#[inline]
	pub const fn offset(&self) -> usize {
		self.offset
	}

	#[inline]
	pub const fn as_slice(&self) -> &'a [u8] {
		self.bytes
	}

	/// Get a view of `len` bytes starting `start` bytes into this view.
	pub fn subspan(&self, start: usize, len: usize) -> Result<DataRef<'a>> {
		let (start, end) = checked_range(self.offset, self.bytes.len(), start, len)?;
		Ok(DataRef {
			bytes: &self.bytes[start..end],
			offset: self.offset + start,
		})
	}

	/// Split view in two at `mid`.
	pub fn split_at(&self, mid: usize) -> Result<(DataRef<'a>, DataRef<'a>)> {
		let head = self.subspan(0, mid)?;
		let tail = DataRef {
			bytes: &self.bytes[mid..],
			offset: self.offset + mid,
		};
		Ok((head, tail))
	}

	/// Remove the first `len` bytes from the view and return them.
	///
	/// View is left unchanged if there are fewer than `len` bytes.
	pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
		let (head, tail) = self.split_at(len)?;
		*self = tail;
		Ok(head.bytes)
	}

	/// Remove all remaining bytes from the view and return them.
	#[inline]
	pub fn take_rest(&mut self) -> &'a [u8] {
		let bytes = self.bytes;
		self.offset += bytes.len();
		self.bytes = &[];
		bytes
	}
}

impl<'a> From<&'a [u8]> for DataRef<'a> {
	#[inline]
	fn from(bytes: &'a [u8]) -> Self {
		Self::new(bytes)
	}
}

impl AsRef<[u8]> for DataRef<'_> {
	#[inline]
	fn as_ref(&self) -> &[u8] {
		self.bytes
	}
}

/// Mutable view onto a byte buffer.
#[derive(Debug)]
pub struct DataMut<'a> {
	bytes: &'a mut [u8],
	offset: usize,
}

impl<'a> DataMut<'a> {
	/// Create a view over the whole of `bytes`.
	#[inline]
	pub fn new(bytes: &'a mut [u8]) -> Self {
		Self { bytes, offset: 0 }
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Position of the start of this view in the buffer it was created from.
	#[inline]
	pub fn offset(&self) -> usize {
		self.offset
	}

	#[inline]
	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		self.bytes
	}

	#[inline]
	pub fn into_slice(self) -> &'a mut [u8] {
		self.bytes
	}

	/// Get a mutable view of `len` bytes starting `start` bytes into this view.
	pub fn subspan_mut(&mut self, start: usize, len: usize) -> Result<DataMut<'_>> {
		let (start, end) = checked_range(self.offset, self.bytes.len(), start, len)?;
		Ok(DataMut {
			bytes: &mut self.bytes[start..end],
			offset: self.offset + start,
		})
	}

	/// Remove the first `len` bytes from the view and return them for writing.
	///
	/// View is left unchanged if there are fewer than `len` bytes.
	pub fn take(&mut self, len: usize) -> Result<&'a mut [u8]> {
		checked_range(self.offset, self.bytes.len(), 0, len)?;
		let bytes = mem::take(&mut self.bytes);
		let (head, tail) = bytes.split_at_mut(len);
		self.bytes = tail;
		self.offset += len;
		Ok(head)
	}

	/// Copy `src` into the start of the view, and advance past it.
	pub fn write(&mut self, src: &[u8]) -> Result<()> {
		self.take(src.len())?.copy_from_slice(src);
		Ok(())
	}

	/// Write a statically sized value into the start of the view, and advance
	/// past it.
	///
	/// This is the unchecked fast path used when the caller has already sized
	/// the buffer.
	///
	/// # Panics
	///
	/// Panics if fewer than `T::SIZE` bytes remain.
	#[inline]
	pub fn put_static<T: StaticallySized>(&mut self, value: &T) {
		let bytes = mem::take(&mut self.bytes);
		let (head, tail) = bytes.split_at_mut(T::SIZE);
		value.serialize_static(head);
		self.bytes = tail;
		self.offset += T::SIZE;
	}
}

impl<'a> From<&'a mut [u8]> for DataMut<'a> {
	#[inline]
	fn from(bytes: &'a mut [u8]) -> Self {
		Self::new(bytes)
	}
}

/// Validate `start..start + len` lies within a view of `view_len` bytes.
fn checked_range(
	view_offset: usize,
	view_len: usize,
	start: usize,
	len: usize,
) -> Result<(usize, usize)> {
	match start.checked_add(len) {
		Some(end) if end <= view_len => Ok((start, end)),
		_ => Err(Error::BufferOverrun {
			offset: view_offset.saturating_add(start),
			len,
			available: view_len.saturating_sub(start),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subspan_in_bounds() {
		let bytes = [1u8, 2, 3, 4, 5];
		let view = DataRef::new(&bytes);
		let sub = view.subspan(1, 3).unwrap();
		assert_eq!(sub.as_slice(), &[2, 3, 4]);
		assert_eq!(sub.offset(), 1);

		let nested = sub.subspan(2, 1).unwrap();
		assert_eq!(nested.as_slice(), &[4]);
		assert_eq!(nested.offset(), 3);
	}

	#[test]
	fn subspan_out_of_bounds() {
		let bytes = [1u8, 2, 3];
		let view = DataRef::new(&bytes);
		assert_eq!(
			view.subspan(2, 2),
			Err(Error::BufferOverrun {
				offset: 2,
				len: 2,
				available: 1
			})
		);
		assert!(view.subspan(usize::MAX, 2).is_err());
		assert!(view.subspan(1, usize::MAX).is_err());
	}

	#[test]
	fn take_advances_and_fails_cleanly() {
		let bytes = [1u8, 2, 3, 4];
		let mut view = DataRef::new(&bytes);
		assert_eq!(view.take(1).unwrap(), &[1]);
		assert_eq!(view.offset(), 1);
		assert!(view.take(4).is_err());
		// Failed `take` leaves view untouched
		assert_eq!(view.len(), 3);
		assert_eq!(view.take_rest(), &[2, 3, 4]);
		assert!(view.is_empty());
		assert_eq!(view.offset(), 4);
	}

	#[test]
	fn mutable_view_writes() {
		let mut bytes = [0u8; 6];
		let mut view = DataMut::new(&mut bytes);
		view.write(&[9, 8]).unwrap();
		view.put_static(&0x0102u16);
		assert_eq!(view.offset(), 4);
		assert!(view.write(&[1, 2, 3]).is_err());
		view.subspan_mut(1, 1).unwrap().as_mut_slice()[0] = 7;
		assert_eq!(bytes, [9, 8, 1, 2, 0, 7]);
	}
}
