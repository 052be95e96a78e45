//! Static descriptions of record and enum types.
//!
//! A [`Schema`] lists the filterable fields of a record type together with
//! their [`TypeTag`]. The property resolver walks schemas instead of runtime
//! reflection, so every operator and type combination is a plain `match`.
//!
//! Schemas and enum descriptors are `'static` and are normally generated by
//! `#[derive(Filterable)]` and `#[derive(FilterEnum)]`.

use std::fmt;

/// Accessor for the schema of a nested record type.
pub type SchemaRef = fn() -> &'static Schema;

/// Accessor for the descriptor of an enum type.
pub type EnumRef = fn() -> &'static EnumDescriptor;

/// Declared type of a field, with optionality carried separately on
/// [`FieldDef::nullable`].
#[derive(Clone, Copy)]
pub enum TypeTag {
    Bool,
    /// Signed or unsigned integers.
    Int,
    /// Binary floating point.
    Float,
    /// Exact decimal (`rust_decimal::Decimal`).
    Decimal,
    /// UUID.
    Guid,
    /// Date or date/time, compared as a naive UTC date/time.
    DateTime,
    String,
    /// Field-less enum described by an [`EnumDescriptor`].
    Enum(EnumRef),
    /// Nested record, traversed by dotted paths.
    Record(SchemaRef),
}

impl TypeTag {
    /// Returns the display name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Decimal => "decimal",
            TypeTag::Guid => "guid",
            TypeTag::DateTime => "datetime",
            TypeTag::String => "string",
            TypeTag::Enum(_) => "enum",
            TypeTag::Record(_) => "record",
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TypeTag::String)
    }

    /// Returns `true` for types supporting `gt`/`lt`/`between`.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            TypeTag::Int | TypeTag::Float | TypeTag::Decimal | TypeTag::DateTime
        )
    }

    /// Returns `true` for types usable as a sort key.
    pub fn is_sortable(&self) -> bool {
        !matches!(self, TypeTag::Record(_))
    }

    pub fn as_enum(&self) -> Option<&'static EnumDescriptor> {
        match self {
            TypeTag::Enum(descriptor) => Some(descriptor()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&'static Schema> {
        match self {
            TypeTag::Record(schema) => Some(schema()),
            _ => None,
        }
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeTag::Enum(a), TypeTag::Enum(b)) => std::ptr::eq(a(), b()),
            (TypeTag::Record(a), TypeTag::Record(b)) => std::ptr::eq(a(), b()),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl Eq for TypeTag {}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Enum(descriptor) => write!(f, "Enum({})", descriptor().name),
            TypeTag::Record(schema) => write!(f, "Record({})", schema().name),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Filterable fields of a record type.
#[derive(Debug)]
pub struct Schema {
    /// Type name, used in error messages.
    pub name: &'static str,
    pub fields: &'static [FieldDef],
}

impl Schema {
    /// Looks up a field by its exact (case-sensitive) name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A single filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: TypeTag,
    /// Whether the field is optional (`Option<_>`).
    pub nullable: bool,
}

/// Variants of an enum type.
#[derive(Debug)]
pub struct EnumDescriptor {
    pub name: &'static str,
    pub variants: &'static [EnumVariant],
}

/// One enum variant: its symbolic name, stored value and optional display
/// label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: &'static str,
    pub value: i64,
    pub label: Option<&'static str>,
}

impl EnumDescriptor {
    /// Finds the variant stored as `value`.
    pub fn variant(&self, value: i64) -> Option<&'static EnumVariant> {
        self.variants.iter().find(|variant| variant.value == value)
    }

    /// Parses a raw value as a variant name or an integer.
    ///
    /// Names match exactly first, then case-insensitively. Integers must be
    /// the value of a declared variant.
    pub fn parse(&self, raw: &str) -> Option<i64> {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<i64>() {
            return self.variant(value).map(|variant| variant.value);
        }
        self.variants
            .iter()
            .find(|variant| variant.name == raw)
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|variant| variant.name.eq_ignore_ascii_case(raw))
            })
            .map(|variant| variant.value)
    }
}
