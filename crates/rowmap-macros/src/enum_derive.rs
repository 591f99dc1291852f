//! Implementation of the SqlEnum derive macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, Result};

/// Parsed definition of a fieldless enum.
#[derive(Debug)]
pub struct EnumDef {
    /// The enum name.
    pub name: Ident,
    /// Variant identifiers in declaration order.
    pub variants: Vec<Ident>,
}

/// Parse a `DeriveInput` into an `EnumDef`.
pub fn parse_enum(input: &DeriveInput) -> Result<EnumDef> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "SqlEnum cannot be derived for generic enums",
        ));
    }

    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            input,
            "SqlEnum can only be derived for enums",
        ));
    };

    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            input,
            "SqlEnum requires at least one variant",
        ));
    }

    let variants = data
        .variants
        .iter()
        .map(|variant| match variant.fields {
            Fields::Unit => Ok(variant.ident.clone()),
            _ => Err(Error::new_spanned(
                variant,
                "SqlEnum variants cannot carry fields",
            )),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EnumDef {
        name: input.ident.clone(),
        variants,
    })
}

/// Generate `SqlEnum`, codec and `FromRow` implementations.
pub fn generate_enum_impl(def: &EnumDef) -> TokenStream {
    let name = &def.name;
    let names: Vec<String> = def.variants.iter().map(ToString::to_string).collect();
    let variants = &def.variants;

    quote! {
        impl ::rowmap_core::SqlEnum for #name {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }

            fn from_variant_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#names => ::core::option::Option::Some(Self::#variants),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::rowmap_core::TypeInfo for #name {
            const SQL_TYPE: ::rowmap_core::SqlType = ::rowmap_core::SqlType::Enum;
        }

        impl ::core::convert::From<#name> for ::rowmap_core::Value {
            fn from(value: #name) -> Self {
                ::rowmap_core::types::encode_enum(&value)
            }
        }

        impl ::rowmap_core::FromValue for #name {
            fn from_value(
                value: &::rowmap_core::Value,
            ) -> ::core::result::Result<Self, ::rowmap_core::DecodeError> {
                ::rowmap_core::types::decode_enum(value)
            }
        }

        impl ::rowmap_core::FromRow for #name {
            fn from_row(row: &::rowmap_core::Row) -> ::rowmap_core::Result<Self> {
                ::rowmap_core::mapper::map_scalar(row)
            }
        }
    }
}
