//! Homogeneous sequences.
//!
//! Statically sized elements are packed back to back. Dynamically sized
//! elements are each preceded by their length as an `S`, the last included,
//! so a sequence can be decoded without knowing its element count.

use std::{fmt, marker::PhantomData};

use crate::{
	structs::{FieldReader, FieldWriter},
	Data, DefaultSize, Error, Result, Serializable, SizeType,
};

/// Serialize a sequence of elements.
///
/// ```
/// use ser_nu::squash_seq;
///
/// let words = [String::from("foo"), String::from("ba")];
/// let bytes = squash_seq::<u8, _>(&words).unwrap();
/// assert_eq!(bytes, [3, b'f', b'o', b'o', 2, b'b', b'a']);
/// ```
pub fn squash_seq<S: SizeType, T: Serializable>(items: &[T]) -> Result<Data> {
	let mut out = Data::with_capacity(T::SERIALIZED_SIZE.unwrap_or(0) * items.len());
	squash_seq_into::<S, T>(items, &mut out)?;
	Ok(out)
}

/// Append the sequence encoding of `items` to `out`.
pub fn squash_seq_into<S: SizeType, T: Serializable>(items: &[T], out: &mut Data) -> Result<()> {
	let mut writer = FieldWriter::new(out);
	for item in items {
		writer.write_field::<S, T>(item, false)?;
	}
	Ok(())
}

/// Deserialize a sequence written by [`squash_seq`].
///
/// Statically sized elements must exactly fill the buffer, or
/// [`Error::Misaligned`] is returned. Zero-sized elements carry no bytes, so
/// their count cannot be recovered and they always decode as empty.
pub fn expand_seq<S: SizeType, T: Serializable>(bytes: &[u8]) -> Result<Vec<T>> {
	if let Some(size) = T::SERIALIZED_SIZE {
		if bytes.is_empty() {
			return Ok(Vec::new());
		}
		if size == 0 || bytes.len() % size != 0 {
			return Err(Error::Misaligned {
				element_size: size,
				len: bytes.len(),
			});
		}
	}

	let mut reader = FieldReader::new(bytes);
	let mut items = Vec::new();
	while reader.remaining() > 0 {
		items.push(reader.read_field::<S, T>(false)?);
	}
	Ok(items)
}

/// `Vec` wrapper which serializes with [`squash_seq`].
///
/// `Vec<T>` itself only accepts statically sized elements. `Seq` lifts that
/// restriction, so e.g. a list of strings can be a struct field.
pub struct Seq<T, S = DefaultSize> {
	pub items: Vec<T>,
	_size: PhantomData<S>,
}

impl<T, S> Seq<T, S> {
	#[inline]
	pub fn new(items: Vec<T>) -> Self {
		Self {
			items,
			_size: PhantomData,
		}
	}

	#[inline]
	pub fn into_inner(self) -> Vec<T> {
		self.items
	}
}

impl<T: Serializable, S: SizeType> Serializable for Seq<T, S> {
	const SERIALIZED_SIZE: Option<usize> = None;

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		squash_seq_into::<S, T>(&self.items, out)
	}

	#[inline]
	fn deserialize(bytes: &[u8]) -> Result<Self> {
		expand_seq::<S, T>(bytes).map(Self::new)
	}
}

impl<T, S> From<Vec<T>> for Seq<T, S> {
	#[inline]
	fn from(items: Vec<T>) -> Self {
		Self::new(items)
	}
}

impl<T, S> Default for Seq<T, S> {
	fn default() -> Self {
		Self::new(Vec::new())
	}
}

impl<T: Clone, S> Clone for Seq<T, S> {
	fn clone(&self) -> Self {
		Self::new(self.items.clone())
	}
}

impl<T: PartialEq, S> PartialEq for Seq<T, S> {
	fn eq(&self, other: &Self) -> bool {
		self.items == other.items
	}
}

impl<T: Eq, S> Eq for Seq<T, S> {}

impl<T: fmt::Debug, S> fmt::Debug for Seq<T, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Seq").field(&self.items).finish()
	}
}
