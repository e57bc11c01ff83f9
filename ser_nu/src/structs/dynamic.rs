use std::any::type_name;

use super::{log_expand_failure, DynamicStruct, FieldReader, FieldWriter};
use crate::{Data, Result, SizeType};

/// Serialize fields behind a header of their lengths.
///
/// Header holds `FIELD_COUNT - 1` lengths as `S`, then come the payloads in
/// order. Last field's length is whatever remains, so is not recorded.
///
/// ```
/// use ser_nu::squash_dynamic;
///
/// let bytes = squash_dynamic::<u16, _>(&(7u8, String::from("hi"))).unwrap();
/// assert_eq!(bytes, [0, 1, 7, b'h', b'i']);
/// ```
pub fn squash_dynamic<S: SizeType, F: DynamicStruct>(fields: &F) -> Result<Data> {
	let mut out = Data::new();
	squash_dynamic_into::<S, F>(fields, &mut out)?;
	Ok(out)
}

/// Append the dynamic encoding of `fields` to `out`.
pub fn squash_dynamic_into<S: SizeType, F: DynamicStruct>(fields: &F, out: &mut Data) -> Result<()> {
	let fields = fields.serialize_fields()?;
	FieldWriter::new(out).write_dynamic::<S>(&fields)
}

/// Deserialize fields written by [`squash_dynamic`].
///
/// Header lengths are summed with overflow checking, and the total checked
/// against the buffer, before any field is decoded.
pub fn expand_dynamic<S: SizeType, F: DynamicStruct>(bytes: &[u8]) -> Result<F> {
	let mut reader = FieldReader::new(bytes);
	reader
		.read_dynamic_header::<S>(F::FIELD_COUNT)
		.and_then(|lens| F::expand_fields(&mut reader, &lens))
		.and_then(|fields| reader.finish().map(|()| fields))
		.map_err(log_expand_failure("dynamic", type_name::<F>()))
}
