//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the runtime value of a field extracted from a
//! record. Nested records are exposed as [`Value::Record`] so that dotted paths
//! can be followed without knowing the concrete type.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::traits::Filterable;

/// Runtime value for comparison, borrowed from the source record.
///
/// # Example
///
/// ```
/// use sieve::{Value, Number};
///
/// struct Unit {
///     title: String,
///     floor: i32,
/// }
///
/// fn value_of<'a>(unit: &'a Unit, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::String(&unit.title),
///         "floor" => Value::Number(Number::I64(unit.floor as i64)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Integer, float or decimal value.
    Number(Number),
    Guid(Uuid),
    /// Date/time value, naive UTC.
    DateTime(NaiveDateTime),
    /// Stored value of an enum variant.
    Enum(i64),
    Bool(bool),
    /// Nested record, followed by dotted paths.
    Record(&'a dyn Filterable),
    /// Field not present or null.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the date/time value, if present.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the enum value, if present.
    pub fn as_enum(&self) -> Option<i64> {
        match self {
            Value::Enum(v) => Some(*v),
            _ => None,
        }
    }

    /// Extracts the nested record, if present.
    pub fn as_record(&self) -> Option<&'a dyn Filterable> {
        match self {
            Value::Record(r) => Some(*r),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Number(_) => "Number",
            Value::Guid(_) => "Guid",
            Value::DateTime(_) => "DateTime",
            Value::Enum(_) => "Enum",
            Value::Bool(_) => "Bool",
            Value::Record(_) => "Record",
            Value::None => "None",
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Guid(g) => f.debug_tuple("Guid").field(g).finish(),
            Value::DateTime(t) => f.debug_tuple("DateTime").field(t).finish(),
            Value::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Guid(a), Value::Guid(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => std::ptr::addr_eq(*a, *b),
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of four variants to preserve precision.
/// Comparisons between different variants convert to a common type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
    /// Exact decimal.
    Decimal(Decimal),
}

impl Number {
    /// Returns `true` for a float NaN.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::Decimal(a), Number::Decimal(b)) => Some(a.cmp(&b)),

            (Number::I64(a), Number::U64(b)) => Some(compare_signed(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed(b, a).reverse()),

            (Number::Decimal(a), Number::I64(b)) => Some(a.cmp(&Decimal::from(b))),
            (Number::Decimal(a), Number::U64(b)) => Some(a.cmp(&Decimal::from(b))),
            (Number::I64(_) | Number::U64(_), Number::Decimal(_)) => {
                other.compare(self).map(Ordering::reverse)
            }

            // Floats and decimals meet in f64
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

fn compare_signed(a: i64, b: u64) -> Ordering {
    match u64::try_from(a) {
        Ok(a) => a.cmp(&b),
        Err(_) => Ordering::Less,
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::Decimal(d)
    }
}
