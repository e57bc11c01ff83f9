use std::any::type_name;

use super::{log_expand_failure, FieldReader, StaticStruct};
use crate::{Data, Error, Result};

/// Serialize statically sized fields by plain concatenation.
pub fn squash_static<F: StaticStruct>(fields: &F) -> Data {
	let mut out = vec![0; F::TOTAL_SIZE];
	fields.squash_static_into(&mut out);
	out
}

/// Serialize statically sized fields into a caller-sized buffer.
///
/// # Panics
///
/// Panics if `out` is not exactly `F::TOTAL_SIZE` bytes.
pub fn squash_static_into<F: StaticStruct>(fields: &F, out: &mut [u8]) {
	assert_eq!(
		out.len(),
		F::TOTAL_SIZE,
		"squash_static_into buffer is wrongly sized"
	);
	fields.squash_static_into(out);
}

/// Append the static encoding of `fields` to `out`.
pub fn squash_static_append<F: StaticStruct>(fields: &F, out: &mut Data) {
	let start = out.len();
	out.resize(start + F::TOTAL_SIZE, 0);
	fields.squash_static_into(&mut out[start..]);
}

/// Deserialize fields written by [`squash_static`].
///
/// `bytes` must be exactly `F::TOTAL_SIZE` long, or
/// [`Error::SizeMismatch`] is returned.
pub fn expand_static<F: StaticStruct>(bytes: &[u8]) -> Result<F> {
	let log = log_expand_failure("static", type_name::<F>());
	if bytes.len() != F::TOTAL_SIZE {
		return Err(log(Error::SizeMismatch {
			expected: F::TOTAL_SIZE,
			actual: bytes.len(),
		}));
	}

	let mut reader = FieldReader::new(bytes);
	F::expand_static_from(&mut reader)
		.and_then(|fields| reader.finish().map(|()| fields))
		.map_err(log)
}
