use super::{DynamicStruct, FieldReader, FieldWriter, HybridStruct, MixedStruct, StaticStruct};
use crate::{Data, DataMut, Result, Serializable, SizeType, StaticallySized};

// Implement the composition traits for a tuple.
// Last field is named separately, as hybrid and mixed encodings treat it
// differently from the rest.
macro_rules! impl_tuple {
	($(($idx:tt $ty:ident)),* ; $last_idx:tt $last:ident) => {
		impl<$($ty: StaticallySized,)* $last: StaticallySized> StaticStruct for ($($ty,)* $last,) {
			const TOTAL_SIZE: usize = 0 $(+ <$ty as StaticallySized>::SIZE)* + <$last as StaticallySized>::SIZE;

			#[inline]
			fn squash_static_into(&self, out: &mut [u8]) {
				let mut out = DataMut::new(out);
				$(out.put_static(&self.$idx);)*
				out.put_static(&self.$last_idx);
			}

			#[inline]
			fn expand_static_from(reader: &mut FieldReader<'_>) -> Result<Self> {
				Ok(($(reader.read_static::<$ty>()?,)* reader.read_static::<$last>()?,))
			}
		}

		impl<$($ty: StaticallySized,)* $last: Serializable> HybridStruct for ($($ty,)* $last,) {
			const HEAD_SIZE: usize = 0 $(+ <$ty as StaticallySized>::SIZE)*;

			#[inline]
			fn squash_fields(&self, writer: &mut FieldWriter<'_>) -> Result<()> {
				$(writer.write_static(&self.$idx);)*
				writer.write_raw(&self.$last_idx)
			}

			#[inline]
			fn expand_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
				Ok(($(reader.read_static::<$ty>()?,)* reader.read_rest::<$last>()?,))
			}
		}

		impl<$($ty: Serializable,)* $last: Serializable> DynamicStruct for ($($ty,)* $last,) {
			const FIELD_COUNT: usize = $last_idx + 1;

			fn serialize_fields(&self) -> Result<Vec<Data>> {
				Ok(vec![$(self.$idx.serialize()?,)* self.$last_idx.serialize()?])
			}

			fn expand_fields(reader: &mut FieldReader<'_>, lens: &[usize]) -> Result<Self> {
				Ok((
					$(reader.read_sized::<$ty>(lens[$idx])?,)*
					reader.read_sized::<$last>(lens[$last_idx])?,
				))
			}
		}

		impl<$($ty: Serializable,)* $last: Serializable> MixedStruct for ($($ty,)* $last,) {
			#[inline]
			fn squash_fields<S: SizeType>(&self, writer: &mut FieldWriter<'_>) -> Result<()> {
				$(writer.write_field::<S, $ty>(&self.$idx, false)?;)*
				writer.write_field::<S, $last>(&self.$last_idx, true)
			}

			#[inline]
			fn expand_fields<S: SizeType>(reader: &mut FieldReader<'_>) -> Result<Self> {
				Ok((
					$(reader.read_field::<S, $ty>(false)?,)*
					reader.read_field::<S, $last>(true)?,
				))
			}
		}
	};
}

impl_tuple!(; 0 A);
impl_tuple!((0 A); 1 B);
impl_tuple!((0 A), (1 B); 2 C);
impl_tuple!((0 A), (1 B), (2 C); 3 D);
impl_tuple!((0 A), (1 B), (2 C), (3 D); 4 E);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E); 5 F);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E), (5 F); 6 G);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E), (5 F), (6 G); 7 H);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E), (5 F), (6 G), (7 H); 8 I);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E), (5 F), (6 G), (7 H), (8 I); 9 J);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E), (5 F), (6 G), (7 H), (8 I), (9 J); 10 K);
impl_tuple!((0 A), (1 B), (2 C), (3 D), (4 E), (5 F), (6 G), (7 H), (8 I), (9 J), (10 K); 11 L);
