use crate::{
	serialize::append_static,
	size::{decode_len, encode_len},
	Data, DataRef, Error, Result, Serializable, SizeType, StaticallySized,
};

/// Writes struct fields to an output buffer.
///
/// Building block for all the struct encodings, used both by the tuple
/// implementations and by `#[derive(Serializable)]`.
pub struct FieldWriter<'a> {
	out: &'a mut Data,
}

impl<'a> FieldWriter<'a> {
	/// Create a writer which appends to `out`.
	#[inline]
	pub fn new(out: &'a mut Data) -> Self {
		Self { out }
	}

	/// Total length of output buffer, including anything it held before this
	/// writer was created.
	#[inline]
	pub fn len(&self) -> usize {
		self.out.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.out.is_empty()
	}

	/// Write a statically sized field with no length prefix.
	#[inline]
	pub fn write_static<T: StaticallySized>(&mut self, value: &T) {
		append_static(value, self.out);
	}

	/// Write a field in its natural encoding, with no length prefix.
	#[inline]
	pub fn write_raw<T: Serializable>(&mut self, value: &T) -> Result<()> {
		value.serialize_into(self.out)
	}

	/// Write a length prefix.
	#[inline]
	pub fn write_len<S: SizeType>(&mut self, len: usize) -> Result<()> {
		let prefix = encode_len::<S>(len)?;
		append_static(&prefix, self.out);
		Ok(())
	}

	/// Write a field preceded by its length as an `S`.
	///
	/// The field is serialized straight into the output after a placeholder
	/// prefix, which is filled in afterwards. On failure, output is rolled back
	/// to where it was before the call.
	pub fn write_prefixed<S: SizeType, T: Serializable>(&mut self, value: &T) -> Result<()> {
		let start = self.out.len();
		self.out.resize(start + S::SIZE, 0);
		if let Err(err) = self.fill_prefixed::<S, T>(start, value) {
			self.out.truncate(start);
			return Err(err);
		}
		Ok(())
	}

	fn fill_prefixed<S: SizeType, T: Serializable>(&mut self, start: usize, value: &T) -> Result<()> {
		value.serialize_into(self.out)?;
		let payload_start = start + S::SIZE;
		let prefix = encode_len::<S>(self.out.len() - payload_start)?;
		prefix.serialize_static(&mut self.out[start..payload_start]);
		Ok(())
	}

	/// Write a field using the mixed encoding rule.
	///
	/// Statically sized fields are written bare. Dynamically sized fields are
	/// prefixed with their length, unless `last` is set, in which case the
	/// reader infers the length from the end of the buffer.
	#[inline]
	pub fn write_field<S: SizeType, T: Serializable>(&mut self, value: &T, last: bool) -> Result<()> {
		if T::SERIALIZED_SIZE.is_some() || last {
			self.write_raw(value)
		} else {
			self.write_prefixed::<S, T>(value)
		}
	}

	/// Write pre-serialized fields using the dynamic encoding.
	///
	/// Header holds the lengths of all fields but the last, then the payloads
	/// follow in order.
	pub fn write_dynamic<S: SizeType>(&mut self, fields: &[Data]) -> Result<()> {
		let header_count = fields.len().saturating_sub(1);
		let payload_len: usize = fields.iter().map(Vec::len).sum();
		self.out.reserve(header_count * S::SIZE + payload_len);

		let start = self.out.len();
		for field in &fields[..header_count] {
			if let Err(err) = self.write_len::<S>(field.len()) {
				self.out.truncate(start);
				return Err(err);
			}
		}
		for field in fields {
			self.out.extend_from_slice(field);
		}
		Ok(())
	}
}

/// Reads struct fields from an input buffer.
///
/// Every read is bounds-checked against the bytes remaining, so a truncated or
/// corrupt buffer produces an [`Error`] rather than a panic.
#[derive(Clone, Debug)]
pub struct FieldReader<'a> {
	data: DataRef<'a>,
}

impl<'a> FieldReader<'a> {
	#[inline]
	pub fn new(bytes: &'a [u8]) -> Self {
		Self {
			data: DataRef::new(bytes),
		}
	}

	/// Number of bytes not yet read.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len()
	}

	/// Number of bytes read so far.
	#[inline]
	pub fn offset(&self) -> usize {
		self.data.offset()
	}

	/// Read a statically sized field.
	#[inline]
	pub fn read_static<T: StaticallySized>(&mut self) -> Result<T> {
		T::deserialize(self.data.take(T::SIZE)?)
	}

	/// Read a field occupying the next `len` bytes.
	#[inline]
	pub fn read_sized<T: Serializable>(&mut self, len: usize) -> Result<T> {
		T::deserialize(self.data.take(len)?)
	}

	/// Read a field occupying all remaining bytes.
	#[inline]
	pub fn read_rest<T: Serializable>(&mut self) -> Result<T> {
		T::deserialize(self.data.take_rest())
	}

	/// Read a length prefix.
	#[inline]
	pub fn read_len<S: SizeType>(&mut self) -> Result<usize> {
		decode_len::<S>(self.data.take(S::SIZE)?)
	}

	/// Read a field preceded by its length as an `S`.
	#[inline]
	pub fn read_prefixed<S: SizeType, T: Serializable>(&mut self) -> Result<T> {
		let len = self.read_len::<S>()?;
		self.read_sized(len)
	}

	/// Read a field written by [`FieldWriter::write_field`].
	#[inline]
	pub fn read_field<S: SizeType, T: Serializable>(&mut self, last: bool) -> Result<T> {
		match T::SERIALIZED_SIZE {
			Some(size) => self.read_sized(size),
			None if last => self.read_rest(),
			None => self.read_prefixed::<S, T>(),
		}
	}

	/// Read the header of a dynamic encoding with `field_count` fields.
	///
	/// Returns the length of every field, the last one being whatever remains
	/// after the others. Fails if the recorded lengths overflow `usize` or add
	/// up to more than the buffer holds.
	pub fn read_dynamic_header<S: SizeType>(&mut self, field_count: usize) -> Result<Vec<usize>> {
		if field_count == 0 {
			return Ok(Vec::new());
		}

		let header_len = (field_count - 1)
			.checked_mul(S::SIZE)
			.ok_or(Error::SizeOverflow("dynamic header length overflows usize"))?;
		let header = self.data.take(header_len)?;

		let mut lens = header
			.chunks_exact(S::SIZE)
			.map(decode_len::<S>)
			.collect::<Result<Vec<_>>>()?;

		let total = lens
			.iter()
			.try_fold(0usize, |total, &len| total.checked_add(len))
			.ok_or(Error::SizeOverflow("dynamic field lengths overflow usize"))?;

		let available = self.remaining();
		if total > available {
			return Err(Error::BufferOverrun {
				offset: self.offset(),
				len: total,
				available,
			});
		}

		lens.push(available - total);
		Ok(lens)
	}

	/// Check the whole buffer has been consumed.
	pub fn finish(self) -> Result<()> {
		if self.data.is_empty() {
			Ok(())
		} else {
			let consumed = self.offset();
			Err(Error::SizeMismatch {
				expected: consumed,
				actual: consumed + self.remaining(),
			})
		}
	}
}
