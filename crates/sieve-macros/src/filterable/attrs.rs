//! Attribute parsing for the `Filterable` and `FilterEnum` derive macros.
//!
//! Fields use `#[filter(Kind, rename = "...")]`, enum variants use
//! `#[filter(label = "...", rename = "...")]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, LitStr, Meta, Result, Token,
};

const KIND_NAMES: &str = "String, Int, Float, Decimal, Guid, DateTime, Enum, Bool, Record";

/// Declared kind of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
    Float,
    Decimal,
    Guid,
    DateTime,
    Enum,
    Bool,
    Record,
}

impl FieldKind {
    /// Parses a kind name, accepting the capitalized form and common
    /// lowercase spellings.
    pub fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" | "str" => Ok(FieldKind::String),
            "Int" | "int" | "integer" => Ok(FieldKind::Int),
            "Float" | "float" => Ok(FieldKind::Float),
            "Decimal" | "decimal" => Ok(FieldKind::Decimal),
            "Guid" | "guid" | "Uuid" | "uuid" => Ok(FieldKind::Guid),
            "DateTime" | "datetime" | "date" => Ok(FieldKind::DateTime),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            "Record" | "record" | "nested" => Ok(FieldKind::Record),
            other => Err(Error::new(
                span,
                format!("unknown filter kind: '{other}'. Expected one of: {KIND_NAMES}"),
            )),
        }
    }

    fn from_ident(ident: &Ident) -> Result<Self> {
        FieldKind::parse(&ident.to_string(), ident.span())
    }
}

/// Field-level attributes from `#[filter(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    pub kind: Option<FieldKind>,
    /// Exclude this field from the schema.
    pub skip: bool,
    /// Property name used in filters (default: field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(FieldKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected filter kind ({KIND_NAMES}) or skip"),
                        ));
                    }
                }

                // rename = "name" or ty = "enum"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_value(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("ty") {
                        let lit = string_value(&nv.value, "ty")?;
                        attr.kind = Some(FieldKind::parse(&lit.value(), lit.span())?);
                        attr.span = lit.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown filter attribute. Expected: {KIND_NAMES}, skip, \
                             rename = \"...\", or ty = \"...\""
                        ),
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Variant-level attributes from `#[filter(...)]` on an enum variant.
#[derive(Debug, Clone, Default)]
pub struct VariantAttr {
    /// Display label searched by `eq`/`contains`.
    pub label: Option<String>,
    /// Symbolic name (default: variant name).
    pub rename: Option<String>,
}

impl Parse for VariantAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = VariantAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("label") => {
                    attr.label = Some(string_value(&nv.value, "label")?.value());
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_value(&nv.value, "rename")?.value());
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown variant attribute. Expected: label = \"...\" or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn string_value<'a>(expr: &'a Expr, name: &str) -> Result<&'a LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s),
        _ => Err(Error::new(
            expr.span(),
            format!("{name} must be a string literal"),
        )),
    }
}

fn find_filter_attr<T: Parse + Default>(attrs: &[Attribute]) -> Result<T> {
    for attr in attrs {
        if attr.path().is_ident("filter") {
            return attr.parse_args::<T>();
        }
    }
    Ok(T::default())
}

/// Extracts `#[filter(...)]` from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    find_filter_attr(attrs)
}

/// Extracts `#[filter(...)]` from a variant's attributes.
pub fn parse_variant_attrs(attrs: &[Attribute]) -> Result<VariantAttr> {
    find_filter_attr(attrs)
}
