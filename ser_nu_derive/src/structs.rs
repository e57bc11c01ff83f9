use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataStruct, Generics, Ident, Index, Member, Type};

use crate::{
	add_field_bounds,
	attrs::{default_size, Encoding, Options},
};

struct Field {
	member: Member,
	ty: Type,
}

pub fn derive_struct(
	data: DataStruct,
	ident: Ident,
	generics: Generics,
	options: Options,
) -> TokenStream {
	let fields = data
		.fields
		.iter()
		.enumerate()
		.map(|(index, field)| Field {
			member: match &field.ident {
				Some(ident) => Member::Named(ident.clone()),
				None => Member::Unnamed(Index::from(index)),
			},
			ty: field.ty.clone(),
		})
		.collect::<Vec<_>>();

	let encoding = options
		.encoding
		.unwrap_or_else(|| Encoding::Mixed(default_size()));

	match encoding {
		Encoding::Fixed => derive_fixed(&fields, &ident, &generics),
		Encoding::Hybrid => derive_hybrid(&fields, &ident, &generics),
		Encoding::Mixed(size) => derive_mixed(&fields, &ident, &generics, &size),
		Encoding::Dynamic(size) => derive_dynamic(&fields, &ident, &generics, &size),
		Encoding::Transparent => {
			derive_transparent(&fields, &ident, &generics, options.statically_sized)
		}
		Encoding::Via(base) => derive_via(&ident, &generics, &base, options.statically_sized),
	}
}

fn derive_fixed(fields: &[Field], ident: &Ident, generics: &Generics) -> TokenStream {
	let members = fields.iter().map(|field| &field.member).collect::<Vec<_>>();
	let tys = fields.iter().map(|field| &field.ty).collect::<Vec<_>>();

	let generics = add_field_bounds(
		generics,
		tys.iter().map(|ty| (*ty, quote!(::ser_nu::StaticallySized))),
	);
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	let puts = fields.iter().map(|Field { member, ty }| {
		quote_spanned! {ty.span()=>
			out.put_static(&self.#member);
		}
	});

	quote! {
		#[automatically_derived]
		#[allow(unused_mut, unused_variables)]
		impl #impl_generics ::ser_nu::structs::StaticStruct for #ident #type_generics #where_clause {
			const TOTAL_SIZE: usize = 0 #(+ <#tys as ::ser_nu::StaticallySized>::SIZE)*;

			fn squash_static_into(&self, out: &mut [u8]) {
				let mut out = ::ser_nu::DataMut::new(out);
				#(#puts)*
			}

			fn expand_static_from(
				reader: &mut ::ser_nu::structs::FieldReader<'_>,
			) -> ::ser_nu::Result<Self> {
				::core::result::Result::Ok(Self {
					#(#members: reader.read_static::<#tys>()?,)*
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> = ::core::option::Option::Some(
				<Self as ::ser_nu::structs::StaticStruct>::TOTAL_SIZE
			);

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				::ser_nu::structs::squash_static_append(self, out);
				::core::result::Result::Ok(())
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				::ser_nu::expand_static::<Self>(bytes)
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_nu::StaticallySized for #ident #type_generics #where_clause {
			const SIZE: usize = <Self as ::ser_nu::structs::StaticStruct>::TOTAL_SIZE;

			#[inline]
			fn serialize_static(&self, out: &mut [u8]) {
				::ser_nu::structs::StaticStruct::squash_static_into(self, out);
			}
		}
	}
}

fn derive_hybrid(fields: &[Field], ident: &Ident, generics: &Generics) -> TokenStream {
	let Some((last, head)) = fields.split_last() else {
		panic!("`#[squash(hybrid)]` needs at least one field");
	};
	let head_members = head.iter().map(|field| &field.member).collect::<Vec<_>>();
	let head_tys = head.iter().map(|field| &field.ty).collect::<Vec<_>>();
	let Field {
		member: last_member,
		ty: last_ty,
	} = last;

	let generics = add_field_bounds(
		generics,
		head_tys
			.iter()
			.map(|ty| (*ty, quote!(::ser_nu::StaticallySized)))
			.chain([(last_ty, quote!(::ser_nu::Serializable))]),
	);
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
	let serialized_size = serialized_size(fields);

	quote! {
		#[automatically_derived]
		impl #impl_generics ::ser_nu::structs::HybridStruct for #ident #type_generics #where_clause {
			const HEAD_SIZE: usize = 0 #(+ <#head_tys as ::ser_nu::StaticallySized>::SIZE)*;

			fn squash_fields(
				&self,
				writer: &mut ::ser_nu::structs::FieldWriter<'_>,
			) -> ::ser_nu::Result<()> {
				#(writer.write_static(&self.#head_members);)*
				writer.write_raw(&self.#last_member)
			}

			fn expand_fields(
				reader: &mut ::ser_nu::structs::FieldReader<'_>,
			) -> ::ser_nu::Result<Self> {
				::core::result::Result::Ok(Self {
					#(#head_members: reader.read_static::<#head_tys>()?,)*
					#last_member: reader.read_rest::<#last_ty>()?,
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> = #serialized_size;

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				::ser_nu::structs::squash_hybrid_into(self, out)
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				::ser_nu::expand_hybrid::<Self>(bytes)
			}
		}
	}
}

fn derive_mixed(fields: &[Field], ident: &Ident, generics: &Generics, size: &Type) -> TokenStream {
	let members = fields.iter().map(|field| &field.member).collect::<Vec<_>>();
	let tys = fields.iter().map(|field| &field.ty).collect::<Vec<_>>();
	let lasts = (0..fields.len())
		.map(|index| index + 1 == fields.len())
		.collect::<Vec<_>>();

	let generics = add_field_bounds(
		generics,
		tys.iter().map(|ty| (*ty, quote!(::ser_nu::Serializable))),
	);
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
	let serialized_size = serialized_size(fields);

	quote! {
		#[automatically_derived]
		#[allow(unused_variables)]
		impl #impl_generics ::ser_nu::structs::MixedStruct for #ident #type_generics #where_clause {
			fn squash_fields<__S: ::ser_nu::SizeType>(
				&self,
				writer: &mut ::ser_nu::structs::FieldWriter<'_>,
			) -> ::ser_nu::Result<()> {
				#(writer.write_field::<__S, #tys>(&self.#members, #lasts)?;)*
				::core::result::Result::Ok(())
			}

			fn expand_fields<__S: ::ser_nu::SizeType>(
				reader: &mut ::ser_nu::structs::FieldReader<'_>,
			) -> ::ser_nu::Result<Self> {
				::core::result::Result::Ok(Self {
					#(#members: reader.read_field::<__S, #tys>(#lasts)?,)*
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> = #serialized_size;

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				::ser_nu::structs::squash_into::<#size, Self>(self, out)
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				::ser_nu::expand::<#size, Self>(bytes)
			}
		}
	}
}

fn derive_dynamic(fields: &[Field], ident: &Ident, generics: &Generics, size: &Type) -> TokenStream {
	let members = fields.iter().map(|field| &field.member).collect::<Vec<_>>();
	let tys = fields.iter().map(|field| &field.ty).collect::<Vec<_>>();
	let indexes = (0..fields.len()).map(Index::from).collect::<Vec<_>>();
	let field_count = fields.len();

	let generics = add_field_bounds(
		generics,
		tys.iter().map(|ty| (*ty, quote!(::ser_nu::Serializable))),
	);
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	// Header makes the encoding dynamically sized even if every field is static
	quote! {
		#[automatically_derived]
		#[allow(unused_variables)]
		impl #impl_generics ::ser_nu::structs::DynamicStruct for #ident #type_generics #where_clause {
			const FIELD_COUNT: usize = #field_count;

			fn serialize_fields(&self) -> ::ser_nu::Result<::std::vec::Vec<::ser_nu::Data>> {
				::core::result::Result::Ok(::std::vec![
					#(::ser_nu::Serializable::serialize(&self.#members)?,)*
				])
			}

			fn expand_fields(
				reader: &mut ::ser_nu::structs::FieldReader<'_>,
				lens: &[usize],
			) -> ::ser_nu::Result<Self> {
				::core::result::Result::Ok(Self {
					#(#members: reader.read_sized::<#tys>(lens[#indexes])?,)*
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> = ::core::option::Option::None;

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				::ser_nu::structs::squash_dynamic_into::<#size, Self>(self, out)
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				::ser_nu::expand_dynamic::<#size, Self>(bytes)
			}
		}
	}
}

fn derive_transparent(
	fields: &[Field],
	ident: &Ident,
	generics: &Generics,
	statically_sized: bool,
) -> TokenStream {
	let [Field { member, ty }] = fields else {
		panic!("`#[squash(transparent)]` needs exactly one field");
	};

	let bound = if statically_sized {
		quote!(::ser_nu::StaticallySized)
	} else {
		quote!(::ser_nu::Serializable)
	};
	let generics = add_field_bounds(generics, [(ty, bound)]);
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	let static_impl = if statically_sized {
		quote! {
			#[automatically_derived]
			impl #impl_generics ::ser_nu::StaticallySized for #ident #type_generics #where_clause {
				const SIZE: usize = <#ty as ::ser_nu::StaticallySized>::SIZE;

				#[inline]
				fn serialize_static(&self, out: &mut [u8]) {
					::ser_nu::StaticallySized::serialize_static(&self.#member, out);
				}
			}
		}
	} else {
		quote! {}
	};

	quote! {
		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> =
				<#ty as ::ser_nu::Serializable>::SERIALIZED_SIZE;

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				::ser_nu::Serializable::serialize_into(&self.#member, out)
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				::core::result::Result::Ok(Self {
					#member: <#ty as ::ser_nu::Serializable>::deserialize(bytes)?,
				})
			}
		}

		#static_impl
	}
}

/// Delegate to `base`, converting with `From` in both directions.
///
/// Shared with enums.
pub fn derive_via(
	ident: &Ident,
	generics: &Generics,
	base: &Type,
	statically_sized: bool,
) -> TokenStream {
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	let static_impl = if statically_sized {
		quote! {
			#[automatically_derived]
			impl #impl_generics ::ser_nu::StaticallySized for #ident #type_generics #where_clause {
				const SIZE: usize = <#base as ::ser_nu::StaticallySized>::SIZE;

				#[inline]
				fn serialize_static(&self, out: &mut [u8]) {
					let base = <#base as ::core::convert::From<&Self>>::from(self);
					::ser_nu::StaticallySized::serialize_static(&base, out);
				}
			}
		}
	} else {
		quote! {}
	};

	quote! {
		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> =
				<#base as ::ser_nu::Serializable>::SERIALIZED_SIZE;

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				let base = <#base as ::core::convert::From<&Self>>::from(self);
				::ser_nu::Serializable::serialize_into(&base, out)
			}

			#[inline]
			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				<#base as ::ser_nu::Serializable>::deserialize(bytes)
					.map(<Self as ::core::convert::From<#base>>::from)
			}
		}

		#static_impl
	}
}

/// `SERIALIZED_SIZE` expression for a struct whose encoding adds nothing to
/// its fields when they are all statically sized.
fn serialized_size(fields: &[Field]) -> TokenStream {
	let tys = fields.iter().map(|field| &field.ty);
	quote! {
		::ser_nu::structs::sum_sizes(&[
			#(<#tys as ::ser_nu::Serializable>::SERIALIZED_SIZE,)*
		])
	}
}
