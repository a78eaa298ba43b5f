//! Derive macros for the mepa crate.
//!
//! Provides:
//! - `#[derive(Error)]` - `Display` and `std::error::Error` for fault enums,
//!   with `#[from]` conversions for wrapping variants

mod error;

use proc_macro::TokenStream;

/// Implements `Display`, `Error` and any `#[from]` conversions for error types.
#[proc_macro_derive(Error, attributes(error, from))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
