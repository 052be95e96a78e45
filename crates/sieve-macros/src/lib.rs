//! Derive macros for sieve.
//!
//! # Available Macros
//!
//! - [`Filterable`] - Generate a record schema and field accessor from struct
//!   field annotations
//! - [`FilterEnum`] - Generate an enum descriptor, with optional display
//!   labels, from a field-less enum
//!
//! The generated code refers to the `sieve` crate by absolute path, so these
//! macros are meant to be used through `sieve`'s re-exports (the default
//! `derive` feature).
//!
//! # Examples
//!
//! For working examples, see `sieve/tests/derive.rs`.

mod filterable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Filterable` trait for record structs.
///
/// Only fields carrying a `#[filter(...)]` kind are part of the schema.
/// Wrapping a field in `Option` makes it nullable.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text field (`String`, `&'static str`) |
/// | `Int` | Integer field (`i8`..`i64`, `u8`..`u64`, `isize`, `usize`) |
/// | `Float` | Floating point field (`f32`, `f64`) |
/// | `Decimal` | `rust_decimal::Decimal` field |
/// | `Guid` | `uuid::Uuid` field |
/// | `DateTime` | `chrono` date/time field (`NaiveDateTime`, `NaiveDate`, `DateTime<Tz>`) |
/// | `Bool` | Boolean field |
/// | `Enum` | Field of a type implementing `FilterEnum` |
/// | `Record` | Nested record implementing `Filterable` (enables `"unit.title"` paths) |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Property name used in filters (default: field name) |
/// | `ty = "..."` | Kind given as a string, e.g. `ty = "enum"` |
///
/// # Generated Code
///
/// 1. Property name constants (e.g., `Unit::TITLE`, `Unit::RENT`)
/// 2. `Filterable::schema()` returning a static `Schema`
/// 3. `Filterable::field_value()`
///
/// Generic structs are not supported.
///
/// # Example
///
/// ```ignore
/// use sieve::{compile_filter, FilterCondition, Filterable};
///
/// #[derive(Filterable)]
/// struct Building {
///     #[filter(String)]
///     city: String,
/// }
///
/// #[derive(Filterable)]
/// struct Unit {
///     #[filter(String)]
///     title: String,
///
///     #[filter(Int, rename = "monthlyRent")]
///     rent: u32,
///
///     #[filter(Record)]
///     building: Option<Building>,
///
///     #[filter(skip)]
///     internal_id: u64,
/// }
///
/// let filter = compile_filter::<Unit>(&[
///     FilterCondition::new("building.city", "eq", "Tabriz"),
///     FilterCondition::new(Unit::MONTHLY_RENT, "lt", "900"),
/// ]);
/// ```
#[proc_macro_derive(Filterable, attributes(filter))]
pub fn filterable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    filterable::filterable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives the `FilterEnum` trait for field-less enums.
///
/// Stored values follow Rust's discriminant rules: explicit integer
/// discriminants are used as written, other variants count up from the
/// previous one (starting at `0`).
///
/// # Variant Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `label = "..."` | Display label matched by `eq` and `contains` filters |
/// | `rename = "..."` | Symbolic name accepted as a raw value (default: variant name) |
///
/// # Example
///
/// ```ignore
/// use sieve::FilterEnum;
///
/// #[derive(FilterEnum)]
/// enum Priority {
///     #[filter(label = "Low priority")]
///     Low = 1,
///     #[filter(label = "Urgent")]
///     High = 5,
///     Unset = -1,
/// }
///
/// assert_eq!(Priority::High.discriminant(), 5);
/// assert_eq!(Priority::descriptor().parse("low"), Some(1));
/// ```
#[proc_macro_derive(FilterEnum, attributes(filter))]
pub fn filter_enum_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    filterable::filter_enum_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
