use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::common::{check_supported, variant_index};

/// Builds `Path { a: decode()?, .. }`, `Path(decode()?, ..)` or `Path`.
fn construct(path: proc_macro2::TokenStream, fields: &Fields) -> proc_macro2::TokenStream {
    let decode = quote!(::diem_bcs::Decode::decode::<__F>(__input)?);
    match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|f| &f.ident);
            quote!(#path { #(#idents: #decode),* })
        }
        Fields::Unnamed(unnamed) => {
            let decodes = unnamed.unnamed.iter().map(|_| &decode);
            quote!(#path( #(#decodes),* ))
        }
        Fields::Unit => path,
    }
}

/// Implements `diem_bcs::Decode`.
///
/// Fields are decoded in declaration order, which struct expressions
/// guarantee for their field initializers.
pub(crate) fn try_derive(ast: DeriveInput) -> Result<proc_macro2::TokenStream> {
    check_supported(&ast)?;
    let name = &ast.ident;
    let name_str = name.to_string();

    let body = match &ast.data {
        Data::Struct(data) => {
            let value = construct(quote!(Self), &data.fields);
            quote!(::core::result::Result::Ok(#value))
        }
        Data::Enum(data) => {
            let arms = data.variants.iter().enumerate().map(|(n, variant)| {
                let ident = &variant.ident;
                let index = variant_index(n);
                let value = construct(quote!(Self::#ident), &variant.fields);
                quote!(#index => ::core::result::Result::Ok(#value),)
            });
            quote! {
                let __start = *__input;
                match <__F as ::diem_bcs::Format>::read_variant_index(__input)? {
                    #(#arms)*
                    __index => {
                        *__input = __start;
                        ::diem_bcs::unknown_variant(__input, #name_str, __index)
                    }
                }
            }
        }
        Data::Union(_) => unreachable!("rejected by check_supported"),
    };

    Ok(quote! {
        impl ::diem_bcs::Decode for #name {
            #[allow(unused_variables)]
            fn decode<__F: ::diem_bcs::Format>(
                __input: &mut &[u8],
            ) -> ::diem_bcs::PResult<Self> {
                #body
            }
        }
    })
}
