use syn::{
	parenthesized,
	parse::{Parse, ParseStream},
	parse_quote,
	punctuated::Punctuated,
	token, Attribute, Ident, Token, Type,
};

/// How a type is encoded, chosen with `#[squash(...)]`.
pub enum Encoding {
	/// `fixed`: all fields statically sized, packed.
	Fixed,
	/// `hybrid`: all fields but the last statically sized.
	Hybrid,
	/// `mixed` or `mixed(S)`: the default for structs.
	Mixed(Type),
	/// `dynamic` or `dynamic(S)`: header of field lengths.
	Dynamic(Type),
	/// `transparent`: same encoding as the single field.
	Transparent,
	/// `via(Base)`: convert to and from `Base`, and use its encoding.
	Via(Type),
}

pub struct Options {
	/// `None` if no encoding was specified.
	pub encoding: Option<Encoding>,
	/// `fixed` was given alongside `transparent` or `via`, so the type is also
	/// `StaticallySized`.
	pub statically_sized: bool,
}

/// Single argument of `#[squash(...)]`, e.g. `hybrid` or `mixed(u16)`.
struct SquashArg {
	name: Ident,
	ty: Option<Type>,
}

impl Parse for SquashArg {
	fn parse(input: ParseStream) -> syn::Result<Self> {
		let name: Ident = input.parse()?;
		let ty = if input.peek(token::Paren) {
			let content;
			parenthesized!(content in input);
			Some(content.parse::<Type>()?)
		} else {
			None
		};
		Ok(Self { name, ty })
	}
}

pub fn get_options(attrs: &[Attribute]) -> Options {
	let mut fixed = false;
	let mut encoding: Option<Encoding> = None;

	let args = attrs
		.iter()
		.filter(|attr| attr.path.is_ident("squash"))
		.flat_map(|attr| {
			attr
				.parse_args_with(Punctuated::<SquashArg, Token![,]>::parse_terminated)
				.expect("Malformed `#[squash]` attr")
		});

	for SquashArg { name, ty } in args {
		let name = name.to_string();
		let parsed = match (name.as_str(), ty) {
			("fixed", None) => {
				if fixed {
					panic!("`fixed` specified twice in `#[squash]`");
				}
				fixed = true;
				continue;
			}
			("hybrid", None) => Encoding::Hybrid,
			("mixed", ty) => Encoding::Mixed(ty.unwrap_or_else(default_size)),
			("dynamic", ty) => Encoding::Dynamic(ty.unwrap_or_else(default_size)),
			("transparent", None) => Encoding::Transparent,
			("via", Some(ty)) => Encoding::Via(ty),
			("via", None) => panic!("`via` needs a type e.g. `#[squash(via(u32))]`"),
			_ => panic!("Unknown `#[squash]` option `{}`", name),
		};
		if encoding.is_some() {
			panic!("Can only specify one encoding in `#[squash]`");
		}
		encoding = Some(parsed);
	}

	match (fixed, encoding) {
		(false, encoding) => Options {
			encoding,
			statically_sized: false,
		},
		(true, None) => Options {
			encoding: Some(Encoding::Fixed),
			statically_sized: true,
		},
		(true, Some(encoding @ (Encoding::Transparent | Encoding::Via(_)))) => Options {
			encoding: Some(encoding),
			statically_sized: true,
		},
		(true, Some(_)) => {
			panic!("`fixed` can only be combined with `transparent` or `via` in `#[squash]`")
		}
	}
}

pub fn default_size() -> Type {
	parse_quote!(::ser_nu::DefaultSize)
}

/// Get integer type from `#[repr(...)]`, if there is one.
///
/// Reprs this can't parse (e.g. `align(8)`) are skipped.
pub fn get_repr(attrs: &[Attribute]) -> Option<Ident> {
	attrs
		.iter()
		.filter(|attr| attr.path.is_ident("repr"))
		.flat_map(|attr| {
			attr
				.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)
				.into_iter()
				.flatten()
		})
		.find(|ident| {
			matches!(
				ident.to_string().as_str(),
				"u8" | "u16" | "u32" | "u64" | "u128" | "i8" | "i16" | "i32" | "i64" | "i128"
			)
		})
}
