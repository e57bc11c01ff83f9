use num_bigint::{BigInt, BigUint};

use crate::{Data, Result, Serializable};

// Magnitude as big-endian bytes, minimal length. Zero encodes as a single 0
// byte, and an empty buffer also decodes as zero.
impl Serializable for BigUint {
	const SERIALIZED_SIZE: Option<usize> = None;

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		out.extend_from_slice(&self.to_bytes_be());
		Ok(())
	}

	#[inline]
	fn deserialize(bytes: &[u8]) -> Result<Self> {
		Ok(BigUint::from_bytes_be(bytes))
	}
}

// Big-endian two's complement, minimal length. Sign lives in the top bit of
// the first byte, so no separate sign byte is needed.
impl Serializable for BigInt {
	const SERIALIZED_SIZE: Option<usize> = None;

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		out.extend_from_slice(&self.to_signed_bytes_be());
		Ok(())
	}

	#[inline]
	fn deserialize(bytes: &[u8]) -> Result<Self> {
		Ok(BigInt::from_signed_bytes_be(bytes))
	}
}
