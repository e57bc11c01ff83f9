use std::any::type_name;

use super::{log_expand_failure, FieldReader, FieldWriter, MixedStruct};
use crate::{Data, Result, SizeType};

/// Serialize fields with the mixed encoding.
///
/// Statically sized fields are written as they are. Each dynamically sized
/// field is preceded by its length as an `S`, except the last field, which
/// never is.
///
/// ```
/// use ser_nu::squash;
///
/// let bytes = squash::<u16, _>(&(String::from("ab"), 1u8, String::from("c"))).unwrap();
/// assert_eq!(bytes, [0, 2, b'a', b'b', 1, b'c']);
/// ```
pub fn squash<S: SizeType, F: MixedStruct>(fields: &F) -> Result<Data> {
	let mut out = Data::new();
	squash_into::<S, F>(fields, &mut out)?;
	Ok(out)
}

/// Append the mixed encoding of `fields` to `out`.
pub fn squash_into<S: SizeType, F: MixedStruct>(fields: &F, out: &mut Data) -> Result<()> {
	fields.squash_fields::<S>(&mut FieldWriter::new(out))
}

/// Deserialize fields written by [`squash`].
pub fn expand<S: SizeType, F: MixedStruct>(bytes: &[u8]) -> Result<F> {
	let mut reader = FieldReader::new(bytes);
	F::expand_fields::<S>(&mut reader)
		.and_then(|fields| reader.finish().map(|()| fields))
		.map_err(log_expand_failure("mixed", type_name::<F>()))
}
