//! Implementation of the Model derive macro.
//!
//! Builds the static field descriptor table from the struct definition and
//! emits the codec glue the row mapper calls through `Model`.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, Lit, Result, Type};

/// Parsed definition of a struct with `#[derive(Model)]`.
#[derive(Debug)]
pub struct ModelDef {
    /// The struct name.
    pub name: Ident,
    /// Mapped fields in declaration order (skipped fields excluded).
    pub fields: Vec<ModelFieldDef>,
}

/// Parsed definition of one mapped field.
#[derive(Debug)]
pub struct ModelFieldDef {
    /// The field identifier.
    pub ident: Ident,
    /// The field type.
    pub ty: Type,
    /// Canonical column spelling.
    pub column: String,
    /// Whether this is the identity field.
    pub primary_key: bool,
}

/// Parse a `DeriveInput` into a `ModelDef`.
pub fn parse_model(input: &DeriveInput) -> Result<ModelDef> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => parse_model_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs; use SqlEnum for enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Model can only be derived for structs, not unions",
            ));
        }
    };

    Ok(ModelDef {
        name: input.ident.clone(),
        fields: resolve_primary_key(fields, input)?,
    })
}

fn parse_model_fields(fields: &Fields) -> Result<Vec<ModelFieldDef>> {
    match fields {
        Fields::Named(named) => {
            let mut parsed = Vec::with_capacity(named.named.len());
            for field in &named.named {
                if let Some(def) = parse_model_field(field)? {
                    parsed.push(def);
                }
            }
            Ok(parsed)
        }
        Fields::Unnamed(_) => Err(Error::new_spanned(
            fields,
            "Model requires a struct with named fields",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

/// Parse one field and its `#[model(...)]` attributes. Returns `None` for
/// skipped fields.
fn parse_model_field(field: &Field) -> Result<Option<ModelFieldDef>> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut column = None;
    let mut primary_key = false;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("primary_key") {
                primary_key = true;
            } else if path.is_ident("skip") {
                skip = true;
            } else if path.is_ident("column") {
                let value: Lit = meta.value()?.parse()?;
                match value {
                    Lit::Str(lit_str) if !lit_str.value().is_empty() => {
                        column = Some(lit_str.value());
                    }
                    other => {
                        return Err(Error::new_spanned(
                            other,
                            "expected non-empty string literal for column",
                        ));
                    }
                }
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown model attribute `{attr_name}`. \
                         Valid attributes are: primary_key, column, skip"
                    ),
                ));
            }

            Ok(())
        })?;
    }

    if skip {
        if primary_key || column.is_some() {
            return Err(Error::new_spanned(
                field,
                "a skipped field cannot carry primary_key or column",
            ));
        }
        return Ok(None);
    }

    let column = column.unwrap_or_else(|| unraw(&ident));
    Ok(Some(ModelFieldDef {
        ident,
        ty: field.ty.clone(),
        column,
        primary_key,
    }))
}

/// Pick the identity field: the one tagged `primary_key`, otherwise the one
/// named `id` ignoring case.
fn resolve_primary_key(
    mut fields: Vec<ModelFieldDef>,
    input: &DeriveInput,
) -> Result<Vec<ModelFieldDef>> {
    let tagged = fields.iter().filter(|f| f.primary_key).count();
    if tagged > 1 {
        return Err(Error::new_spanned(
            input,
            "at most one field may be marked #[model(primary_key)]",
        ));
    }
    if tagged == 0 {
        if let Some(field) = fields
            .iter_mut()
            .find(|f| unraw(&f.ident).eq_ignore_ascii_case("id"))
        {
            field.primary_key = true;
        }
    }
    Ok(fields)
}

fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Generate the `Model` and `FromRow` implementations.
pub fn generate_model_impl(def: &ModelDef) -> TokenStream {
    let name = &def.name;
    let shape_name = name.to_string();

    let descriptors = def.fields.iter().map(|field| {
        let ty = &field.ty;
        let field_name = unraw(&field.ident);
        let column = &field.column;
        let primary_key = field.primary_key;
        quote! {
            ::rowmap_core::FieldInfo::new(
                #field_name,
                #column,
                <#ty as ::rowmap_core::TypeInfo>::SQL_TYPE,
            )
            .nullable(<#ty as ::rowmap_core::TypeInfo>::NULLABLE)
            .primary_key(#primary_key)
        }
    });

    let encoders = def.fields.iter().enumerate().map(|(idx, field)| {
        let ident = &field.ident;
        quote! {
            #idx => ::rowmap_core::Value::from(::core::clone::Clone::clone(&self.#ident)),
        }
    });

    let decoders = def.fields.iter().enumerate().map(|(idx, field)| {
        let ident = &field.ident;
        let ty = &field.ty;
        quote! {
            #idx => self.#ident = <#ty as ::rowmap_core::FromValue>::from_value(value)?,
        }
    });

    quote! {
        impl ::rowmap_core::Model for #name {
            fn fields() -> &'static [::rowmap_core::FieldInfo] {
                static FIELDS: &[::rowmap_core::FieldInfo] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }

            fn field_value(&self, index: usize) -> ::rowmap_core::Value {
                match index {
                    #(#encoders)*
                    _ => ::rowmap_core::Value::Null,
                }
            }

            fn set_field_value(
                &mut self,
                index: usize,
                value: &::rowmap_core::Value,
            ) -> ::core::result::Result<(), ::rowmap_core::DecodeError> {
                match index {
                    #(#decoders)*
                    _ => {}
                }
                ::core::result::Result::Ok(())
            }

            fn shape_name() -> &'static str {
                #shape_name
            }
        }

        impl ::rowmap_core::FromRow for #name {
            fn from_row(row: &::rowmap_core::Row) -> ::rowmap_core::Result<Self> {
                ::rowmap_core::mapper::map_model(row)
            }
        }
    }
}
