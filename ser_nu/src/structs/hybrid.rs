use std::any::type_name;

use super::{log_expand_failure, FieldReader, FieldWriter, HybridStruct};
use crate::{Data, Result};

/// Serialize fields where all but the last are statically sized.
///
/// Head fields are packed with no prefixes, then the last field is appended
/// in its natural encoding.
pub fn squash_hybrid<F: HybridStruct>(fields: &F) -> Result<Data> {
	let mut out = Data::with_capacity(F::HEAD_SIZE);
	squash_hybrid_into(fields, &mut out)?;
	Ok(out)
}

/// Append the hybrid encoding of `fields` to `out`.
pub fn squash_hybrid_into<F: HybridStruct>(fields: &F, out: &mut Data) -> Result<()> {
	fields.squash_fields(&mut FieldWriter::new(out))
}

/// Deserialize fields written by [`squash_hybrid`].
///
/// Last field is decoded from whatever follows the head fields.
pub fn expand_hybrid<F: HybridStruct>(bytes: &[u8]) -> Result<F> {
	let mut reader = FieldReader::new(bytes);
	F::expand_fields(&mut reader)
		.and_then(|fields| reader.finish().map(|()| fields))
		.map_err(log_expand_failure("hybrid", type_name::<F>()))
}
