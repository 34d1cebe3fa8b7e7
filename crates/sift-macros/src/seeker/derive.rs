//! Implementation of the `#[derive(Seekable)]` macro.
//!
//! This macro generates an implementation of the `Seekable` trait, which
//! registers one accessor per field, and field name constants for type-safe
//! query building.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument,
    PathArguments, Result, Type,
};

use super::attrs::{parse_seek_attrs, serde_rename};

/// Main implementation of the Seekable derive macro.
pub fn seekable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Seekable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Seekable can only be derived for structs",
            ))
        }
    };

    let mut registrations: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let seek_attrs = parse_seek_attrs(&field.attrs)?;
        if seek_attrs.skip {
            continue;
        }

        let query_name = field_name.unraw().to_string();
        let alias = seek_attrs
            .rename
            .or_else(|| serde_rename(&field.attrs))
            .filter(|alias| *alias != query_name);

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for type-safe queries.
            pub const #const_name: &'static str = #query_name;
        });

        if seek_attrs.nested {
            let (shape, inner) = nested_shape(&field.ty);
            let getter = match shape {
                Shape::Direct => quote! { ::core::option::Option::Some(&record.#field_name) },
                Shape::Boxed => quote! { ::core::option::Option::Some(&*record.#field_name) },
                Shape::Optional => quote! { record.#field_name.as_ref() },
                Shape::OptionalBoxed => quote! { record.#field_name.as_deref() },
            };
            let alias = match &alias {
                Some(alias) => quote! { ::core::option::Option::Some(#alias) },
                None => quote! { ::core::option::Option::None },
            };
            registrations.push(quote! {
                fields.nested::<#inner>(#query_name, #alias, |record| #getter);
            });
        } else {
            let accessor = quote! {
                |record: &Self| ::sift::SeekField::seek_value(&record.#field_name)
            };
            registrations.push(match &alias {
                Some(alias) => quote! { fields.field_with_alias(#query_name, #alias, #accessor); },
                None => quote! { fields.field(#query_name, #accessor); },
            });
        }
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::sift::Seekable for #struct_name #ty_generics #where_clause {
            fn describe(fields: &mut ::sift::FieldSet<Self>) {
                #(#registrations)*
            }
        }
    };

    Ok(expanded)
}

/// How a nested member holds its struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Direct,
    Boxed,
    Optional,
    OptionalBoxed,
}

/// Splits `Option<Box<U>>`, `Option<U>`, `Box<U>` or `U` into its shape and `U`.
fn nested_shape(ty: &Type) -> (Shape, &Type) {
    match wrapped(ty, "Option") {
        Some(inner) => match wrapped(inner, "Box") {
            Some(boxed) => (Shape::OptionalBoxed, boxed),
            None => (Shape::Optional, inner),
        },
        None => match wrapped(ty, "Box") {
            Some(boxed) => (Shape::Boxed, boxed),
            None => (Shape::Direct, ty),
        },
    }
}

fn wrapped<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
