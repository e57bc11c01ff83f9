use crate::{
	serialize::{append_static, expect_len},
	Data, Error, Result, Serializable, StaticallySized,
};

// Raw UTF-8 bytes. No length prefix, no size limit, so always dynamically
// sized.
impl Serializable for String {
	const SERIALIZED_SIZE: Option<usize> = None;

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		out.extend_from_slice(self.as_bytes());
		Ok(())
	}

	#[inline]
	fn deserialize(bytes: &[u8]) -> Result<Self> {
		Ok(String::from_utf8(bytes.to_vec())?)
	}
}

// Elements back to back. `Data` (`Vec<u8>`) is therefore its raw bytes.
impl<T: StaticallySized> Serializable for Vec<T> {
	const SERIALIZED_SIZE: Option<usize> = None;

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		T::serialize_slice(self, out);
		Ok(())
	}

	#[inline]
	fn deserialize(bytes: &[u8]) -> Result<Self> {
		T::deserialize_slice(bytes)
	}
}

impl<T: StaticallySized, const N: usize> Serializable for [T; N] {
	const SERIALIZED_SIZE: Option<usize> = Some(T::SIZE * N);

	#[inline]
	fn serialize_into(&self, out: &mut Data) -> Result<()> {
		append_static(self, out);
		Ok(())
	}

	fn deserialize(bytes: &[u8]) -> Result<Self> {
		expect_len(Self::SIZE, bytes)?;
		// Zero-sized elements leave no bytes to count, but `N` is known
		let values = if T::SIZE == 0 {
			(0..N).map(|_| T::deserialize(&[])).collect::<Result<Vec<_>>>()?
		} else {
			T::deserialize_slice(bytes)?
		};
		let actual = values.len();
		values.try_into().map_err(|_| Error::InvalidLength {
			expected: N,
			actual,
		})
	}
}

impl<T: StaticallySized, const N: usize> StaticallySized for [T; N] {
	const SIZE: usize = T::SIZE * N;

	fn serialize_static(&self, out: &mut [u8]) {
		if T::SIZE == 0 {
			return;
		}
		for (value, chunk) in self.iter().zip(out.chunks_exact_mut(T::SIZE)) {
			value.serialize_static(chunk);
		}
	}
}
