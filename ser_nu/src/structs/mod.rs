//! Struct composition.
//!
//! A struct is serialized as the concatenation of its fields, in declaration
//! order. Four encodings differ in how they record where one field ends and
//! the next begins:
//!
//! | encoding | functions                                  | field boundaries                            |
//! |----------|--------------------------------------------|---------------------------------------------|
//! | static   | [`squash_static`] / [`expand_static`]      | all fields statically sized, none recorded  |
//! | dynamic  | [`squash_dynamic`] / [`expand_dynamic`]    | header of all lengths but the last          |
//! | hybrid   | [`squash_hybrid`] / [`expand_hybrid`]      | static fields first, last field takes rest  |
//! | mixed    | [`squash`] / [`expand`]                    | prefix before each dynamic field but last   |
//!
//! Each encoding has a trait which a struct type implements to take part.
//! Tuples of 1 to 12 fields implement them all (where field types allow), and
//! `#[derive(Serializable)]` implements the chosen one for named structs.

mod dynamic;
mod fields;
mod fixed;
mod hybrid;
mod mixed;
mod tuples;

pub use dynamic::{expand_dynamic, squash_dynamic, squash_dynamic_into};
pub use fields::{FieldReader, FieldWriter};
pub use fixed::{expand_static, squash_static, squash_static_append, squash_static_into};
pub use hybrid::{expand_hybrid, squash_hybrid, squash_hybrid_into};
pub use mixed::{expand, squash, squash_into};

use tracing::debug;

use crate::{Data, Error, Result, SizeType};

/// Struct whose fields are all statically sized.
pub trait StaticStruct: Sized {
	/// Sum of the sizes of all fields.
	const TOTAL_SIZE: usize;

	/// Write all fields into `out`, which must be exactly `TOTAL_SIZE` bytes.
	fn squash_static_into(&self, out: &mut [u8]);

	fn expand_static_from(reader: &mut FieldReader<'_>) -> Result<Self>;
}

/// Struct whose fields are all statically sized except possibly the last.
pub trait HybridStruct: Sized {
	/// Sum of the sizes of all fields but the last.
	const HEAD_SIZE: usize;

	fn squash_fields(&self, writer: &mut FieldWriter<'_>) -> Result<()>;

	fn expand_fields(reader: &mut FieldReader<'_>) -> Result<Self>;
}

/// Struct serialized with a header of field lengths.
pub trait DynamicStruct: Sized {
	const FIELD_COUNT: usize;

	/// Serialize each field separately, in declaration order.
	fn serialize_fields(&self) -> Result<Vec<Data>>;

	/// Read each field, given the lengths decoded from the header.
	///
	/// `lens` always has exactly `FIELD_COUNT` entries.
	fn expand_fields(reader: &mut FieldReader<'_>, lens: &[usize]) -> Result<Self>;
}

/// Struct serialized with the mixed encoding.
pub trait MixedStruct: Sized {
	fn squash_fields<S: SizeType>(&self, writer: &mut FieldWriter<'_>) -> Result<()>;

	fn expand_fields<S: SizeType>(reader: &mut FieldReader<'_>) -> Result<Self>;
}

/// Add up field sizes.
///
/// Returns `None` if any field is dynamically sized. Usable in const context,
/// which is how derived structs compute their `SERIALIZED_SIZE`.
pub const fn sum_sizes(sizes: &[Option<usize>]) -> Option<usize> {
	let mut total = 0;
	let mut index = 0;
	while index < sizes.len() {
		match sizes[index] {
			Some(size) => total += size,
			None => return None,
		}
		index += 1;
	}
	Some(total)
}

/// Log a failed decode on its way back to the caller.
fn log_expand_failure(encoding: &'static str, type_name: &'static str) -> impl FnOnce(Error) -> Error {
	move |err| {
		debug!(encoding, type_name, error = %err, "failed to expand struct");
		err
	}
}
