use quote::quote;
use syn::{Data, DeriveInput, Result};

use crate::common::{bind_fields, check_supported, variant_index};

/// Implements `diem_bcs::Encode`.
pub(crate) fn try_derive(ast: DeriveInput) -> Result<proc_macro2::TokenStream> {
    check_supported(&ast)?;
    let name = &ast.ident;

    let body = match &ast.data {
        Data::Struct(data) => {
            let members = data.fields.members();
            quote! {
                #( ::diem_bcs::Encode::encode::<__F>(&self.#members, __out); )*
            }
        }
        Data::Enum(data) if data.variants.is_empty() => quote!(match *self {}),
        Data::Enum(data) => {
            let arms = data.variants.iter().enumerate().map(|(n, variant)| {
                let ident = &variant.ident;
                let index = variant_index(n);
                let (pattern, fields) = bind_fields(&variant.fields);
                quote! {
                    Self::#ident #pattern => {
                        <__F as ::diem_bcs::Format>::write_variant_index(__out, #index);
                        #( ::diem_bcs::Encode::encode::<__F>(#fields, __out); )*
                    }
                }
            });
            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Union(_) => unreachable!("rejected by check_supported"),
    };

    Ok(quote! {
        impl ::diem_bcs::Encode for #name {
            #[allow(unused_variables)]
            fn encode<__F: ::diem_bcs::Format>(&self, __out: &mut ::std::vec::Vec<u8>) {
                #body
            }
        }
    })
}
