//! Derive support for `textform_convert`.
//!
//! See [`Convertible`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Ident, parse_macro_input};

static CONVERTIBLE_ATTRIBUTE_NAME: &str = "convertible";

// -----------------------------------------------------------------------------
// Macros

/// # Conversion Capability Derivation
///
/// `#[derive(Convertible)]` implements the following traits:
///
/// - `TypePath`
/// - `Describe` (kind `Struct` or `Enum`, matching the item)
/// - `GetTypeRecord`
///
/// The generated record is driven by `#[convertible(...)]` flags naming the
/// conversion conventions the type supports. At least one is required:
///
/// | Flag | Required impl | Tier |
/// |---|---|---|
/// | `from_text` | `textform_convert::FromText` | `FromText` |
/// | `parse` | `core::str::FromStr` | `Parse` |
/// | `create` | `TryFrom<&str>` | `Create` |
/// | `create_owned` | `TryFrom<String>` | `Create` |
/// | `convert` | `From<&str>` | `Convert` |
/// | `convert_owned` | `From<String>` | `Convert` |
///
/// The string rendering entry is always registered from the type's
/// [`Display`](core::fmt::Display) implementation, which is therefore
/// required.
///
/// ```rust, ignore
/// #[derive(Convertible)]
/// #[convertible(parse)]
/// struct Widget {
///     code: String,
/// }
/// ```
///
/// ## auto_register
///
/// The `auto_register` flag additionally submits the type to
/// `inventory`-based collection, so that
/// `ConvertRegistry::auto_register` picks it up without an explicit
/// `register` call:
///
/// ```rust, ignore
/// #[derive(Convertible)]
/// #[convertible(parse, auto_register)]
/// struct Widget { /* ... */ }
/// ```
///
/// The flag only takes effect when the `auto_register` feature of
/// `textform_convert` is enabled; without it the flag expands to nothing.
///
/// ## Generic types
///
/// Generic types are not supported by the derive: each concrete
/// instantiation has its own conversion entries, so register them by hand
/// through the `TypeRecord` API.
#[proc_macro_derive(Convertible, attributes(convertible))]
pub fn derive_convertible(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

// -----------------------------------------------------------------------------
// Flags

#[derive(Default)]
struct Flags {
    from_text: bool,
    parse: bool,
    create: bool,
    create_owned: bool,
    convert: bool,
    convert_owned: bool,
    auto_register: bool,
}

impl Flags {
    fn any_convention(&self) -> bool {
        self.from_text
            || self.parse
            || self.create
            || self.create_owned
            || self.convert
            || self.convert_owned
    }
}

fn parse_flags(input: &DeriveInput) -> syn::Result<Flags> {
    let mut flags = Flags::default();
    for attr in &input.attrs {
        if !attr.path().is_ident(CONVERTIBLE_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("from_text") {
                flags.from_text = true;
            } else if meta.path.is_ident("parse") {
                flags.parse = true;
            } else if meta.path.is_ident("create") {
                flags.create = true;
            } else if meta.path.is_ident("create_owned") {
                flags.create_owned = true;
            } else if meta.path.is_ident("convert") {
                flags.convert = true;
            } else if meta.path.is_ident("convert_owned") {
                flags.convert_owned = true;
            } else if meta.path.is_ident("auto_register") {
                flags.auto_register = true;
            } else {
                return Err(meta.error(
                    "unknown `convertible` flag; expected one of `from_text`, `parse`, \
                     `create`, `create_owned`, `convert`, `convert_owned`, `auto_register`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(flags)
}

// -----------------------------------------------------------------------------
// Expansion

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[derive(Convertible)]` does not support generic types; \
             register each instantiation through the `TypeRecord` API",
        ));
    }

    let kind = match &input.data {
        Data::Struct(_) => quote!(Struct),
        Data::Enum(_) => quote!(Enum),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "`#[derive(Convertible)]` does not support unions",
            ));
        }
    };

    let flags = parse_flags(input)?;
    if !flags.any_convention() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "at least one conversion convention flag is required, e.g. \
             `#[convertible(parse)]`",
        ));
    }

    let ident = &input.ident;
    let pushes = convention_pushes(&flags);
    let auto_register = if flags.auto_register {
        auto_register_tokens(ident)
    } else {
        TokenStream2::new()
    };

    Ok(quote! {
        impl textform_convert::info::TypePath for #ident {
            fn type_path() -> &'static str {
                ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident))
            }

            fn type_name() -> &'static str {
                ::core::stringify!(#ident)
            }
        }

        impl textform_convert::info::Describe for #ident {
            fn type_desc() -> &'static textform_convert::info::TypeDesc {
                static DESC: textform_convert::info::TypeDesc =
                    textform_convert::info::TypeDesc::new::<#ident>(
                        textform_convert::info::TypeKind::#kind,
                    );
                &DESC
            }
        }

        impl textform_convert::registry::GetTypeRecord for #ident {
            fn get_type_record() -> textform_convert::registry::TypeRecord {
                let mut record = textform_convert::registry::TypeRecord::of::<Self>();
                #(#pushes)*
                record.set_render(textform_convert::RenderImpl::display::<Self>());
                record
            }
        }

        #auto_register
    })
}

fn convention_pushes(flags: &Flags) -> Vec<TokenStream2> {
    let mut pushes = Vec::new();
    let mut push = |convention: TokenStream2, constructor: TokenStream2| {
        pushes.push(quote! {
            record.push_impl(
                textform_convert::Convention::#convention,
                textform_convert::ConvertImpl::#constructor::<Self>(),
            );
        });
    };

    if flags.from_text {
        push(quote!(FromText), quote!(from_text));
    }
    if flags.parse {
        push(quote!(Parse), quote!(parse));
    }
    if flags.create {
        push(quote!(Create), quote!(create));
    }
    if flags.create_owned {
        push(quote!(Create), quote!(create_owned));
    }
    if flags.convert {
        push(quote!(Convert), quote!(convert));
    }
    if flags.convert_owned {
        push(quote!(Convert), quote!(convert_owned));
    }
    pushes
}

#[cfg(feature = "auto_register")]
fn auto_register_tokens(ident: &Ident) -> TokenStream2 {
    quote! {
        textform_convert::__macro_exports::inventory::submit! {
            textform_convert::registry::Registration::new(|registry| {
                registry.register::<#ident>();
            })
        }
    }
}

#[cfg(not(feature = "auto_register"))]
fn auto_register_tokens(_ident: &Ident) -> TokenStream2 {
    TokenStream2::new()
}
