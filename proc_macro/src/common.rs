use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Result};

/// Prefixes an error message and generates a `syn::Error` from the message.
macro_rules! span_err {
    ($ast:expr, $msg:literal $(,)?) => {
        ::syn::Error::new_spanned($ast, ::core::concat!("diem_bcs_derive error: ", $msg))
    };
}
pub(crate) use span_err;

/// Checks the condition and returns early with a prefixed error message if
/// false.
macro_rules! ensure {
    ($cond:expr, $ast:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::common::span_err!($ast, $msg));
        }
    };
}

/// Rejects the shapes neither derive can handle.
pub(crate) fn check_supported(ast: &DeriveInput) -> Result<()> {
    ensure!(
        ast.generics.params.is_empty(),
        &ast.generics,
        "generic types are not supported"
    );
    match &ast.data {
        Data::Struct(_) => Ok(()),
        Data::Enum(data) => {
            for variant in &data.variants {
                ensure!(
                    variant.discriminant.is_none(),
                    variant,
                    "explicit discriminants are not supported, the variant index is its position"
                );
            }
            Ok(())
        }
        Data::Union(_) => Err(span_err!(ast, "expected `struct` or `enum`")),
    }
}

/// The wire index of the `n`th variant, as an unsuffixed literal.
pub(crate) fn variant_index(n: usize) -> Literal {
    Literal::u32_unsuffixed(n as u32)
}

/// A pattern binding every field of a variant to `__field{n}`, along with
/// the bound names in order.
pub(crate) fn bind_fields(fields: &Fields) -> (TokenStream, Vec<proc_macro2::Ident>) {
    let names = (0..fields.len())
        .map(|n| format_ident!("__field{}", n))
        .collect::<Vec<_>>();
    let pattern = match fields {
        Fields::Named(named) => {
            let members = named.named.iter().map(|f| &f.ident);
            quote!({ #(#members: #names),* })
        }
        Fields::Unnamed(_) => quote!(( #(#names),* )),
        Fields::Unit => quote!(),
    };
    (pattern, names)
}
