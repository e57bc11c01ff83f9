use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, DataEnum, Fields, Generics, Ident};

use crate::{
	attrs::{get_repr, Encoding, Options},
	structs::derive_via,
};

pub fn derive_enum(
	data: DataEnum,
	ident: Ident,
	generics: Generics,
	attrs: &[Attribute],
	options: Options,
) -> TokenStream {
	match options.encoding {
		None => {}
		Some(Encoding::Via(base)) => {
			return derive_via(&ident, &generics, &base, options.statically_sized);
		}
		Some(_) => panic!("Enums only support `#[squash(via(...))]`"),
	}

	let repr = get_repr(attrs)
		.expect("Deriving `Serializable` on an enum needs an integer repr e.g. `#[repr(u8)]`");

	let variants = data
		.variants
		.into_iter()
		.map(|variant| {
			if !matches!(variant.fields, Fields::Unit) {
				panic!(
					"Cannot derive `Serializable` on enum with fields. Use `#[squash(via(...))]` instead."
				);
			}
			variant.ident
		})
		.collect::<Vec<_>>();

	let type_name = ident.to_string();
	let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

	quote! {
		#[automatically_derived]
		impl #impl_generics ::ser_nu::Serializable for #ident #type_generics #where_clause {
			const SERIALIZED_SIZE: ::core::option::Option<usize> =
				::core::option::Option::Some(<#repr as ::ser_nu::StaticallySized>::SIZE);

			#[inline]
			fn serialize_into(&self, out: &mut ::ser_nu::Data) -> ::ser_nu::Result<()> {
				::ser_nu::append_static(self, out);
				::core::result::Result::Ok(())
			}

			fn deserialize(bytes: &[u8]) -> ::ser_nu::Result<Self> {
				let value = <#repr as ::ser_nu::Serializable>::deserialize(bytes)?;
				#(
					if value == Self::#variants as #repr {
						return ::core::result::Result::Ok(Self::#variants);
					}
				)*
				::core::result::Result::Err(::ser_nu::Error::InvalidDiscriminant {
					type_name: #type_name,
					value: ::std::string::ToString::to_string(&value),
				})
			}
		}

		#[automatically_derived]
		impl #impl_generics ::ser_nu::StaticallySized for #ident #type_generics #where_clause {
			const SIZE: usize = <#repr as ::ser_nu::StaticallySized>::SIZE;

			#[inline]
			fn serialize_static(&self, out: &mut [u8]) {
				let value: #repr = match *self {
					#(Self::#variants => Self::#variants as #repr,)*
				};
				::ser_nu::StaticallySized::serialize_static(&value, out);
			}
		}
	}
}
