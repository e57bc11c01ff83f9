use proc_macro2::{TokenStream, TokenTree};
use syn::{parse_macro_input, Data, DeriveInput, GenericParam, Generics, Ident, Type, WherePredicate};

mod attrs;
use attrs::get_options;
mod structs;
use structs::derive_struct;
mod enums;
use enums::derive_enum;

/// Derive `Serializable` for a struct or fieldless enum.
///
/// Structs use the mixed encoding with `DefaultSize` length prefixes unless
/// `#[squash(...)]` says otherwise:
///
/// * `fixed` - all fields statically sized. Also derives `StaticallySized`.
/// * `hybrid` - all fields but the last statically sized.
/// * `mixed(S)` - mixed encoding with `S` length prefixes.
/// * `dynamic` / `dynamic(S)` - header of field lengths.
/// * `transparent` - encode as the single field.
/// * `via(Base)` - encode as `Base`, converting with `From`.
///
/// `fixed` can be combined with `transparent` or `via` to also derive
/// `StaticallySized`.
///
/// Enums must have a `#[repr]` integer type, and are encoded as it.
#[proc_macro_derive(Serializable, attributes(squash))]
pub fn serializable(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	serializable_impl(input).into()
}

fn serializable_impl(input: DeriveInput) -> TokenStream {
	let options = get_options(&input.attrs);
	match input.data {
		Data::Struct(data) => derive_struct(data, input.ident, input.generics, options),
		Data::Enum(data) => derive_enum(data, input.ident, input.generics, &input.attrs, options),
		Data::Union(_) => panic!("Deriving `Serializable` on unions not supported"),
	}
}

/// Add `field_type: bound` to the where clause for each field type which
/// involves a type parameter.
///
/// Concrete field types need no bound. If one doesn't implement the trait,
/// the generated code fails to compile anyway, with a clearer error.
pub(crate) fn add_field_bounds<'a>(
	generics: &Generics,
	bounded: impl IntoIterator<Item = (&'a Type, TokenStream)>,
) -> Generics {
	let params = generics
		.params
		.iter()
		.filter_map(|param| match param {
			GenericParam::Type(param) => Some(param.ident.clone()),
			_ => None,
		})
		.collect::<Vec<_>>();

	let mut generics = generics.clone();
	if params.is_empty() {
		return generics;
	}

	let where_clause = generics.make_where_clause();
	for (ty, bound) in bounded {
		if mentions_any(quote::ToTokens::to_token_stream(ty), &params) {
			let predicate: WherePredicate = syn::parse_quote!(#ty: #bound);
			where_clause.predicates.push(predicate);
		}
	}
	generics
}

fn mentions_any(tokens: TokenStream, idents: &[Ident]) -> bool {
	tokens.into_iter().any(|token| match token {
		TokenTree::Ident(ident) => idents.contains(&ident),
		TokenTree::Group(group) => mentions_any(group.stream(), idents),
		_ => false,
	})
}
