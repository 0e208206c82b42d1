//! Derive macros for `diem_bcs::Encode` and `diem_bcs::Decode`.
//!
//! Structs encode their fields in declaration order with no framing. Enums
//! encode the position of the variant (starting at zero) through the
//! format's variant index, followed by the variant's fields.
//!
//! Because the variant index is the declaration position, reordering
//! variants or fields changes the wire format. Explicit discriminants are
//! rejected so they can't be mistaken for wire indices.
//!
//! Generic types are not supported.

pub(crate) mod common;
mod impls;

use impls::{decode, encode};

#[proc_macro_derive(Encode)]
pub fn derive_encode(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    encode::try_derive(ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Decode)]
pub fn derive_decode(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    decode::try_derive(ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
