use std::fmt::Debug;

use crate::{Error, Result, Serializable, StaticallySized};

/// Integer types usable as length prefixes in dynamic and mixed encodings.
///
/// Prefixes are encoded like any other integer: big-endian, `SIZE` bytes wide.
/// Choosing a narrow type (e.g. `u16`) saves space, at the cost of limiting
/// the length of each prefixed field.
pub trait SizeType: StaticallySized + Copy + Debug + Send + Sync + 'static {
	/// Longest length this type can express.
	const MAX_LEN: u64;

	/// Convert a length to this type, if it fits.
	fn from_len(len: usize) -> Option<Self>;

	/// Convert to a length, if it fits in `usize` on this platform.
	fn to_len(self) -> Option<usize>;
}

/// Length prefix type used when none is specified.
pub type DefaultSize = u32;

macro_rules! impl_size_type {
	($($ty:ty),*) => {
		$(
			impl SizeType for $ty {
				const MAX_LEN: u64 = <$ty>::MAX as u64;

				#[inline]
				fn from_len(len: usize) -> Option<Self> {
					<$ty>::try_from(len).ok()
				}

				#[inline]
				fn to_len(self) -> Option<usize> {
					usize::try_from(self).ok()
				}
			}
		)*
	};
}

impl_size_type!(u8, u16, u32, u64);

/// Convert `len` to a length prefix.
pub(crate) fn encode_len<S: SizeType>(len: usize) -> Result<S> {
	S::from_len(len).ok_or(Error::LengthTooLarge {
		len,
		max: S::MAX_LEN,
	})
}

/// Decode a length prefix from exactly `S::SIZE` bytes.
pub(crate) fn decode_len<S: SizeType>(bytes: &[u8]) -> Result<usize> {
	S::deserialize(bytes)?
		.to_len()
		.ok_or(Error::SizeOverflow("length prefix does not fit in usize"))
}
