use std::string::FromUtf8Error;

use thiserror::Error;

/// Result type returned by all fallible serialization operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reasons serialization or deserialization can fail.
///
/// Every check the codecs and struct encodings perform against buffer
/// lengths reports its own variant, so a caller can tell which size or
/// bounds check rejected a corrupt or truncated input.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
	/// A statically sized value was decoded from a buffer of the wrong length.
	#[error("invalid length: expected {expected} bytes, got {actual}")]
	InvalidLength { expected: usize, actual: usize },

	/// Slicing would read or write past the end of a buffer.
	#[error(
		"buffer overrun: {len} bytes requested at offset {offset}, but only {available} available"
	)]
	BufferOverrun {
		offset: usize,
		len: usize,
		available: usize,
	},

	/// Buffer length disagrees with the total size of the fields it should hold.
	#[error("size mismatch: expected {expected} bytes, got {actual}")]
	SizeMismatch { expected: usize, actual: usize },

	/// Length arithmetic would overflow `usize`.
	#[error("size overflow: {0}")]
	SizeOverflow(&'static str),

	/// A field is too long for the chosen length prefix type.
	#[error("field of {len} bytes does not fit a length prefix with maximum {max}")]
	LengthTooLarge { len: usize, max: u64 },

	/// An encoded integer does not correspond to any value of the target type.
	///
	/// `value` is the integer in decimal, so any width (up to `u128`) is
	/// reported exactly.
	#[error("invalid discriminant {value} for `{type_name}`")]
	InvalidDiscriminant {
		type_name: &'static str,
		value: String,
	},

	/// A `String` was decoded from bytes which are not UTF-8.
	#[error("invalid UTF-8: {0}")]
	InvalidUtf8(#[from] FromUtf8Error),

	/// A sequence of fixed-size elements has trailing bytes.
	#[error("buffer of {len} bytes is not a multiple of element size {element_size}")]
	Misaligned { element_size: usize, len: usize },

	/// Any other inconsistency, with a human-readable reason.
	#[error("malformed input: {0}")]
	Malformed(String),
}

impl Error {
	/// Shorthand for [`Error::Malformed`].
	pub fn malformed(reason: impl Into<String>) -> Self {
		Error::Malformed(reason.into())
	}
}
