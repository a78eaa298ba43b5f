//! Derive macro for fault and error types.
//!
//! Generates `std::fmt::Display`, `std::error::Error` and, for variants that
//! wrap another error with `#[from]`, a `From` conversion plus `source()`.
//!
//! # Usage
//!
//! ```ignore
//! use mepa_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum LoadError {
//!     #[error("{0}")]
//!     Syntax(#[from] SyntaxFault),
//!
//!     #[error("line {line}: unknown opcode '{mnemonic}'")]
//!     UnknownOpcode { line: u32, mnemonic: String },
//!
//!     #[error("empty program")]
//!     Empty,
//! }
//! ```
//!
//! Every field must be referenced by the message: fields are passed to
//! `write!` as named arguments and unused ones are rejected by the compiler.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{Data, DeriveInput, Fields, Lit, Meta, Variant, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    match &input.data {
        Data::Enum(data) => {
            let mut display_arms = Vec::with_capacity(data.variants.len());
            let mut source_arms = Vec::new();
            let mut conversions = Vec::new();

            for variant in &data.variants {
                display_arms.push(display_arm(variant)?);

                if let Some(inner) = from_field(variant)? {
                    let variant_name = &variant.ident;
                    source_arms.push(quote! {
                        Self::#variant_name(inner) => ::std::option::Option::Some(inner),
                    });
                    conversions.push(quote! {
                        impl #impl_generics ::std::convert::From<#inner> for #name #ty_generics #where_clause {
                            fn from(source: #inner) -> Self {
                                Self::#variant_name(source)
                            }
                        }
                    });
                }
            }

            let error_body = if source_arms.is_empty() {
                quote! {}
            } else {
                quote! {
                    fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
                        #[allow(unreachable_patterns)]
                        match self {
                            #(#source_arms)*
                            _ => ::std::option::Option::None,
                        }
                    }
                }
            };

            Ok(quote! {
                impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        match self {
                            #(#display_arms)*
                        }
                    }
                }

                impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {
                    #error_body
                }

                #(#conversions)*
            })
        }
        Data::Struct(data) => {
            let message =
                message_from_attrs(&input.attrs, &input.ident, &format!("type `{name}`"))?;

            let body = match &data.fields {
                Fields::Unit => quote! { write!(f, #message) },
                Fields::Named(fields) => {
                    let idents: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                    quote! { write!(f, #message, #(#idents = self.#idents),*) }
                }
                Fields::Unnamed(fields) => {
                    let idents: Vec<_> = (0..fields.unnamed.len())
                        .map(|i| format_ident!("f{}", i))
                        .collect();
                    let indices: Vec<_> = (0..fields.unnamed.len()).map(syn::Index::from).collect();
                    let message = positional_to_named(&message, fields.unnamed.len());
                    quote! { write!(f, #message, #(#idents = self.#indices),*) }
                }
            };

            Ok(quote! {
                impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
                    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        #body
                    }
                }

                impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
            })
        }
        Data::Union(_) => Err(syn::Error::new_spanned(
            input,
            "Error derive does not support unions",
        )),
    }
}

/// Builds the `Display` match arm for one enum variant.
fn display_arm(variant: &Variant) -> syn::Result<TokenStream2> {
    let variant_name = &variant.ident;
    let message = message_from_attrs(
        &variant.attrs,
        &variant.ident,
        &format!("variant `{variant_name}`"),
    )?;

    Ok(match &variant.fields {
        Fields::Unit => quote! {
            Self::#variant_name => write!(f, #message),
        },
        Fields::Unnamed(fields) => {
            let idents: Vec<_> = (0..fields.unnamed.len())
                .map(|i| format_ident!("f{}", i))
                .collect();
            let message = positional_to_named(&message, fields.unnamed.len());
            quote! {
                Self::#variant_name(#(#idents),*) => write!(f, #message, #(#idents = #idents),*),
            }
        }
        Fields::Named(fields) => {
            let idents: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
            quote! {
                Self::#variant_name { #(#idents),* } => write!(f, #message, #(#idents = #idents),*),
            }
        }
    })
}

/// Returns the wrapped type when the variant is `Variant(#[from] Inner)`.
fn from_field(variant: &Variant) -> syn::Result<Option<&syn::Type>> {
    let fields = match &variant.fields {
        Fields::Unnamed(fields) => &fields.unnamed,
        Fields::Named(fields) => {
            if let Some(field) = fields
                .named
                .iter()
                .find(|f| f.attrs.iter().any(|a| a.path().is_ident("from")))
            {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[from] is only supported on single-field tuple variants",
                ));
            }
            return Ok(None);
        }
        Fields::Unit => return Ok(None),
    };

    let tagged: Vec<_> = fields
        .iter()
        .filter(|f| f.attrs.iter().any(|a| a.path().is_ident("from")))
        .collect();

    match (tagged.as_slice(), fields.len()) {
        ([], _) => Ok(None),
        ([field], 1) => Ok(Some(&field.ty)),
        _ => Err(syn::Error::new_spanned(
            &variant.ident,
            "#[from] requires a tuple variant with exactly one field",
        )),
    }
}

/// Reads the string literal of the `#[error("...")]` attribute.
fn message_from_attrs<T: ToTokens>(
    attrs: &[syn::Attribute],
    target: &T,
    target_desc: &str,
) -> syn::Result<String> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("error")) else {
        return Err(syn::Error::new_spanned(
            target,
            format!("missing #[error(\"...\")] attribute on {target_desc}"),
        ));
    };

    let Meta::List(list) = &attr.meta else {
        return Err(syn::Error::new_spanned(
            &attr.meta,
            "invalid #[error] attribute; use #[error(\"message\")]",
        ));
    };

    match syn::parse2::<Lit>(list.tokens.clone()) {
        Ok(Lit::Str(lit)) => Ok(lit.value()),
        _ => Err(syn::Error::new_spanned(
            &attr.meta,
            "#[error] expects a string literal, e.g. #[error(\"stack underflow: {0}\")]",
        )),
    }
}

/// Rewrites `{0}`, `{1}` into `{f0}`, `{f1}` so tuple fields can be passed by name.
fn positional_to_named(message: &str, field_count: usize) -> String {
    (0..field_count).rev().fold(message.to_string(), |acc, i| {
        acc.replace(&format!("{{{i}}}"), &format!("{{f{i}}}"))
            .replace(&format!("{{{i}:"), &format!("{{f{i}:"))
    })
}
