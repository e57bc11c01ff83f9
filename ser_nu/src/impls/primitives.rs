use std::mem;

use crate::{
	serialize::{append_static, expect_len},
	Data, Error, Result, Serializable, StaticallySized,
};

// All multi-byte primitives are big-endian on the wire, whatever the host's
// byte order.
macro_rules! impl_primitive {
	($ty:ty) => {
		impl Serializable for $ty {
			const SERIALIZED_SIZE: Option<usize> = Some(mem::size_of::<$ty>());

			#[inline]
			fn serialize_into(&self, out: &mut Data) -> Result<()> {
				append_static(self, out);
				Ok(())
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> Result<Self> {
				let bytes: [u8; mem::size_of::<$ty>()] =
					bytes.try_into().map_err(|_| Error::InvalidLength {
						expected: mem::size_of::<$ty>(),
						actual: bytes.len(),
					})?;
				Ok(<$ty>::from_be_bytes(bytes))
			}
		}

		impl StaticallySized for $ty {
			const SIZE: usize = mem::size_of::<$ty>();

			#[inline]
			fn serialize_static(&self, out: &mut [u8]) {
				out.copy_from_slice(&self.to_be_bytes());
			}
		}
	};
}

impl Serializable for u8 {
	const SERIALIZED_SIZE: Option<usize> = Some(1);

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		out.push(*self);
		Ok(())
	}

	#[inline]
	fn deserialize(bytes: &[u8]) -> Result<Self> {
		expect_len(1, bytes)?;
		Ok(bytes[0])
	}
}

// Byte slices are copied wholesale rather than byte by byte
impl StaticallySized for u8 {
	const SIZE: usize = 1;

	#[inline]
	fn serialize_static(&self, out: &mut [u8]) {
		out[0] = *self;
	}

	#[inline]
	fn serialize_slice(values: &[Self], out: &mut Data) {
		out.extend_from_slice(values);
	}

	#[inline]
	fn deserialize_slice(bytes: &[u8]) -> Result<Vec<Self>> {
		Ok(bytes.to_vec())
	}
}

impl_primitive!(u16);
impl_primitive!(u32);
impl_primitive!(u64);
impl_primitive!(u128);

impl_primitive!(i8);
impl_primitive!(i16);
impl_primitive!(i32);
impl_primitive!(i64);
impl_primitive!(i128);

impl_primitive!(f32);
impl_primitive!(f64);

impl Serializable for bool {
	const SERIALIZED_SIZE: Option<usize> = Some(1);

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		out.push(*self as u8);
		Ok(())
	}

	fn deserialize(bytes: &[u8]) -> Result<Self> {
		match u8::deserialize(bytes)? {
			0 => Ok(false),
			1 => Ok(true),
			value => Err(Error::InvalidDiscriminant {
				type_name: "bool",
				value: value.to_string(),
			}),
		}
	}
}

impl StaticallySized for bool {
	const SIZE: usize = 1;

	#[inline]
	fn serialize_static(&self, out: &mut [u8]) {
		out[0] = *self as u8;
	}
}

// Encoded as the Unicode scalar value
impl Serializable for char {
	const SERIALIZED_SIZE: Option<usize> = Some(4);

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		append_static(self, out);
		Ok(())
	}

	fn deserialize(bytes: &[u8]) -> Result<Self> {
		expect_len(4, bytes)?;
		let value = u32::deserialize(bytes)?;
		char::from_u32(value).ok_or(Error::InvalidDiscriminant {
			type_name: "char",
			value: value.to_string(),
		})
	}
}

impl StaticallySized for char {
	const SIZE: usize = 4;

	#[inline]
	fn serialize_static(&self, out: &mut [u8]) {
		(*self as u32).serialize_static(out);
	}
}
