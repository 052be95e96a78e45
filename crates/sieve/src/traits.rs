//! Traits connecting user types to the compiler.
//!
//! [`Filterable`] is implemented by record types (usually through
//! `#[derive(Filterable)]`), [`FilterEnum`] by field-less enums used as field
//! types, and [`IntoValue`] by the scalar types a field may hold.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::schema::{EnumDescriptor, Schema};
use crate::value::{Number, Value};

/// Trait for record types that filters and sort keys can be compiled against.
///
/// # Derive Usage
///
/// ```
/// use sieve::{Filterable, FilterEnum};
///
/// #[derive(FilterEnum)]
/// enum Role {
///     #[filter(label = "Administrator")]
///     Admin,
///     Member,
/// }
///
/// #[derive(Filterable)]
/// struct User {
///     #[filter(String)]
///     name: String,
///     #[filter(Enum)]
///     role: Role,
///     #[filter(Int)]
///     age: Option<u32>,
/// }
///
/// let schema = <User as sieve::Filterable>::schema();
/// assert_eq!(schema.fields.len(), 3);
/// assert!(schema.field("age").unwrap().nullable);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use sieve::{FieldDef, Filterable, Number, Schema, TypeTag, Value};
///
/// struct Unit {
///     title: String,
///     floor: i32,
/// }
///
/// impl Filterable for Unit {
///     fn schema() -> &'static Schema {
///         static SCHEMA: Schema = Schema {
///             name: "Unit",
///             fields: &[
///                 FieldDef { name: "title", ty: TypeTag::String, nullable: false },
///                 FieldDef { name: "floor", ty: TypeTag::Int, nullable: false },
///             ],
///         };
///         &SCHEMA
///     }
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "title" => Value::String(&self.title),
///             "floor" => Value::Number(Number::from(self.floor)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Filterable {
    /// Returns the static description of this type's filterable fields.
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Returns the value of a field, or [`Value::None`] if it is null or
    /// unknown.
    fn field_value(&self, field: &str) -> Value<'_>;
}

/// Trait for field-less enums used as record fields.
///
/// Usually derived with `#[derive(FilterEnum)]`, which reads display labels
/// from `#[filter(label = "...")]` variant attributes.
pub trait FilterEnum {
    /// Returns the descriptor listing every variant.
    fn descriptor() -> &'static EnumDescriptor
    where
        Self: Sized;

    /// Returns the stored value of this variant.
    fn discriminant(&self) -> i64;
}

/// Conversion of a scalar field into a [`Value`].
///
/// `Option<T>` maps `None` to [`Value::None`].
pub trait IntoValue {
    fn to_value(&self) -> Value<'_>;
}

impl IntoValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn to_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl IntoValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! number_into_value {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_into_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Decimal);

impl IntoValue for Uuid {
    fn to_value(&self) -> Value<'_> {
        Value::Guid(*self)
    }
}

impl IntoValue for NaiveDateTime {
    fn to_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

impl IntoValue for NaiveDate {
    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

impl<Tz: TimeZone> IntoValue for DateTime<Tz> {
    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.naive_utc())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::None,
        }
    }
}

impl<T: IntoValue + ?Sized> IntoValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}
