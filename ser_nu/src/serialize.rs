//! The serialization traits and the free functions built on them.

use crate::{Data, Error, Result};

/// Trait for types which can be serialized.
///
/// Every implementation is classified once, by [`SERIALIZED_SIZE`]:
///
/// * `Some(n)` - statically sized. Encoding is always exactly `n` bytes, and is
///   stored with no length marker. Such types should also implement
///   [`StaticallySized`].
/// * `None` - dynamically sized. Encoding length depends on the value, so any
///   encoding which places it before other data must record its length.
///
/// Struct encodings consult this constant to decide, per field, whether a
/// length prefix is needed.
///
/// [`SERIALIZED_SIZE`]: Serializable::SERIALIZED_SIZE
pub trait Serializable: Sized {
	/// Fixed encoded size, or `None` if dynamically sized.
	const SERIALIZED_SIZE: Option<usize>;

	/// Append encoding of `self` to `out`.
	///
	/// On error, `out` may contain a partial encoding.
	fn serialize_into(&self, out: &mut Data) -> Result<()>;

	/// Decode a value from exactly the bytes `serialize` produced for it.
	fn deserialize(bytes: &[u8]) -> Result<Self>;

	/// Encode `self` into a new buffer.
	fn serialize(&self) -> Result<Data> {
		let mut out = Data::with_capacity(Self::SERIALIZED_SIZE.unwrap_or(0));
		self.serialize_into(&mut out)?;
		Ok(out)
	}
}

/// Trait for types with a fixed encoded size.
///
/// `SIZE` must equal `SERIALIZED_SIZE`. Statically sized types can be written
/// into pre-sized buffers without intermediate allocation, which is what the
/// static and hybrid struct encodings do.
pub trait StaticallySized: Serializable {
	/// Encoded size in bytes.
	const SIZE: usize;

	/// Write encoding of `self` into `out`.
	///
	/// `out` must be exactly `SIZE` bytes. Implementations may panic if not.
	fn serialize_static(&self, out: &mut [u8]);

	/// Append encodings of all `values` to `out`, with no separators.
	fn serialize_slice(values: &[Self], out: &mut Data) {
		out.reserve(values.len().saturating_mul(Self::SIZE));
		for value in values {
			append_static(value, out);
		}
	}

	/// Decode a run of back-to-back encodings, as written by
	/// [`serialize_slice`](StaticallySized::serialize_slice).
	fn deserialize_slice(bytes: &[u8]) -> Result<Vec<Self>> {
		if Self::SIZE == 0 || bytes.len() % Self::SIZE != 0 {
			if bytes.is_empty() {
				return Ok(Vec::new());
			}
			return Err(Error::Misaligned {
				element_size: Self::SIZE,
				len: bytes.len(),
			});
		}
		bytes.chunks_exact(Self::SIZE).map(Self::deserialize).collect()
	}
}

/// Get the fixed encoded size of `T`, or `None` if `T` is dynamically sized.
#[inline]
pub const fn serialized_size<T: Serializable>() -> Option<usize> {
	T::SERIALIZED_SIZE
}

/// Check whether `T` has a fixed encoded size.
#[inline]
pub const fn is_statically_sized<T: Serializable>() -> bool {
	T::SERIALIZED_SIZE.is_some()
}

/// Serialize `value` into a new buffer.
#[inline]
pub fn serialize<T: Serializable>(value: &T) -> Result<Data> {
	value.serialize()
}

/// Serialize `value` into a caller-supplied buffer.
///
/// # Panics
///
/// `out` must be exactly `T::SIZE` bytes long. This is not checked in release
/// builds, and a wrongly sized buffer will cause a panic or a truncated write.
#[inline]
pub fn serialize_static<T: StaticallySized>(value: &T, out: &mut [u8]) {
	debug_assert_eq!(out.len(), T::SIZE, "serialize_static buffer is wrongly sized");
	value.serialize_static(out);
}

/// Deserialize a `T` from `bytes`.
#[inline]
pub fn deserialize<T: Serializable>(bytes: &[u8]) -> Result<T> {
	T::deserialize(bytes)
}

/// Append the static encoding of `value` to `out`.
///
/// Implementations of [`Serializable::serialize_into`] for statically sized
/// types delegate to this.
#[inline]
pub fn append_static<T: StaticallySized>(value: &T, out: &mut Data) {
	let start = out.len();
	out.resize(start + T::SIZE, 0);
	value.serialize_static(&mut out[start..]);
}

/// Check `bytes` is exactly `expected` bytes long.
#[inline]
pub fn expect_len(expected: usize, bytes: &[u8]) -> Result<()> {
	if bytes.len() == expected {
		Ok(())
	} else {
		Err(Error::InvalidLength {
			expected,
			actual: bytes.len(),
		})
	}
}
