//! Implementation of the `#[derive(Filterable)]` and `#[derive(FilterEnum)]`
//! macros.
//!
//! `Filterable` generates a static schema, a field accessor and field name
//! constants. `FilterEnum` generates a static descriptor and the variant to
//! value mapping.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Expr, ExprLit, ExprUnary, Fields,
    GenericArgument, Lit, PathArguments, Result, Type, UnOp,
};

use super::attrs::{parse_field_attrs, parse_variant_attrs, FieldKind};

/// Main implementation of the Filterable derive macro.
pub fn filterable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    reject_generics(&input, "Filterable")?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Filterable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filterable can only be derived for structs",
            ))
        }
    };

    let mut field_defs: Vec<TokenStream> = Vec::new();
    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        // Fields without a kind are not filterable
        let kind = match attrs.kind {
            Some(kind) => kind,
            None => continue,
        };

        let property = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&property));
        field_constants.push(quote! {
            /// Property name for filters and sort keys.
            pub const #const_name: &'static str = #property;
        });

        let (nullable, inner) = match option_inner(&field.ty) {
            Some(inner) => (true, inner),
            None => (false, &field.ty),
        };

        let type_tag = match kind {
            FieldKind::String => quote! { ::sieve::TypeTag::String },
            FieldKind::Int => quote! { ::sieve::TypeTag::Int },
            FieldKind::Float => quote! { ::sieve::TypeTag::Float },
            FieldKind::Decimal => quote! { ::sieve::TypeTag::Decimal },
            FieldKind::Guid => quote! { ::sieve::TypeTag::Guid },
            FieldKind::DateTime => quote! { ::sieve::TypeTag::DateTime },
            FieldKind::Bool => quote! { ::sieve::TypeTag::Bool },
            FieldKind::Enum => quote! {
                ::sieve::TypeTag::Enum(<#inner as ::sieve::FilterEnum>::descriptor)
            },
            FieldKind::Record => quote! {
                ::sieve::TypeTag::Record(<#inner as ::sieve::Filterable>::schema)
            },
        };

        field_defs.push(quote! {
            ::sieve::FieldDef {
                name: #property,
                ty: #type_tag,
                nullable: #nullable,
            }
        });

        let value_expr = match (kind, nullable) {
            (FieldKind::Enum, false) => quote! {
                ::sieve::Value::Enum(::sieve::FilterEnum::discriminant(&self.#field_name))
            },
            (FieldKind::Enum, true) => quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(v) => {
                        ::sieve::Value::Enum(::sieve::FilterEnum::discriminant(v))
                    }
                    ::core::option::Option::None => ::sieve::Value::None,
                }
            },
            (FieldKind::Record, false) => quote! {
                ::sieve::Value::Record(&self.#field_name)
            },
            (FieldKind::Record, true) => quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(v) => ::sieve::Value::Record(v),
                    ::core::option::Option::None => ::sieve::Value::None,
                }
            },
            _ => quote! {
                ::sieve::IntoValue::to_value(&self.#field_name)
            },
        };

        field_matches.push(quote! {
            #property => #value_expr,
        });
    }

    let schema_name = struct_name.to_string();

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::sieve::Filterable for #struct_name {
            fn schema() -> &'static ::sieve::Schema {
                static SCHEMA: ::sieve::Schema = ::sieve::Schema {
                    name: #schema_name,
                    fields: &[#(#field_defs),*],
                };
                &SCHEMA
            }

            fn field_value(&self, field: &str) -> ::sieve::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::sieve::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Main implementation of the FilterEnum derive macro.
pub fn filter_enum_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let enum_name = &input.ident;
    reject_generics(&input, "FilterEnum")?;

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(Error::new(
                input.span(),
                "FilterEnum can only be derived for enums",
            ))
        }
    };

    let mut descriptors: Vec<TokenStream> = Vec::new();
    let mut arms: Vec<TokenStream> = Vec::new();
    let mut next_value: i64 = 0;

    for variant in variants.iter() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "FilterEnum variants cannot have fields",
            ));
        }

        let value = match &variant.discriminant {
            Some((_, expr)) => discriminant_value(expr)?,
            None => next_value,
        };
        next_value = value.wrapping_add(1);

        let attrs = parse_variant_attrs(&variant.attrs)?;
        let ident = &variant.ident;
        let name = attrs.rename.unwrap_or_else(|| ident.to_string());
        let label = match attrs.label {
            Some(label) => quote! { ::core::option::Option::Some(#label) },
            None => quote! { ::core::option::Option::None },
        };

        descriptors.push(quote! {
            ::sieve::EnumVariant {
                name: #name,
                value: #value,
                label: #label,
            }
        });
        arms.push(quote! {
            #enum_name::#ident => #value,
        });
    }

    let descriptor_name = enum_name.to_string();

    let expanded = quote! {
        impl ::sieve::FilterEnum for #enum_name {
            fn descriptor() -> &'static ::sieve::EnumDescriptor {
                static DESCRIPTOR: ::sieve::EnumDescriptor = ::sieve::EnumDescriptor {
                    name: #descriptor_name,
                    variants: &[#(#descriptors),*],
                };
                &DESCRIPTOR
            }

            fn discriminant(&self) -> i64 {
                match *self {
                    #(#arms)*
                }
            }
        }
    };

    Ok(expanded)
}

fn reject_generics(input: &DeriveInput, derive: &str) -> Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new(
            input.generics.span(),
            format!("{derive} cannot be derived for generic types"),
        ))
    }
}

/// Returns `T` if `ty` is `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Evaluates an integer literal discriminant, optionally negated.
fn discriminant_value(expr: &Expr) -> Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<i64>(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => discriminant_value(expr).map(|value| -value),
        Expr::Group(group) => discriminant_value(&group.expr),
        Expr::Paren(paren) => discriminant_value(&paren.expr),
        _ => Err(Error::new(
            expr.span(),
            "FilterEnum discriminants must be integer literals",
        )),
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
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
