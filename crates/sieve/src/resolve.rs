//! Dotted property paths.
//!
//! [`resolve`] turns `"unit.title"` into a [`ResolvedProperty`]: the field
//! names along the path, the innermost declared type, and whether a null can
//! appear anywhere along the way.

use crate::error::{FilterError, Result};
use crate::schema::{Schema, TypeTag};
use crate::traits::Filterable;
use crate::value::Value;

/// A property path validated against a record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    /// Field names from the root record to the target field.
    pub path: Vec<&'static str>,
    /// Declared type of the innermost field.
    pub declared_type: TypeTag,
    /// `true` if the innermost field or any record on the way is optional.
    pub is_nullable: bool,
}

impl ResolvedProperty {
    /// Reads the property from a record; a null intermediate record yields
    /// [`Value::None`].
    pub fn read<'a>(&self, record: &'a dyn Filterable) -> Value<'a> {
        read_path(record, &self.path)
    }

    /// Returns the path in dotted form.
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

/// Resolves a dotted path against the schema of `T`.
///
/// Segments are matched exactly, including case.
pub fn resolve<T: Filterable>(path: &str) -> Result<ResolvedProperty> {
    resolve_in(T::schema(), path)
}

/// Resolves a dotted path against an explicit schema.
pub fn resolve_in(schema: &'static Schema, path: &str) -> Result<ResolvedProperty> {
    let unknown = || FilterError::UnknownProperty {
        path: path.to_string(),
        record: schema.name,
    };

    let mut current = schema;
    let mut segments = Vec::new();
    let mut is_nullable = false;
    let mut parts = path.split('.').peekable();

    while let Some(segment) = parts.next() {
        let field = current.field(segment).ok_or_else(unknown)?;
        segments.push(field.name);
        is_nullable |= field.nullable;

        if parts.peek().is_none() {
            return Ok(ResolvedProperty {
                path: segments,
                declared_type: field.ty,
                is_nullable,
            });
        }

        current = field.ty.as_record().ok_or_else(unknown)?;
    }

    Err(unknown())
}

/// Follows `path` from `record`, descending through [`Value::Record`] values.
pub fn read_path<'a>(record: &'a dyn Filterable, path: &[&str]) -> Value<'a> {
    let Some((first, rest)) = path.split_first() else {
        return Value::None;
    };

    let mut value = record.field_value(first);
    for segment in rest {
        value = match value {
            Value::Record(nested) => nested.field_value(segment),
            _ => return Value::None,
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use crate::traits::IntoValue;

    struct Building {
        city: String,
    }

    struct Unit {
        title: String,
        building: Option<Building>,
    }

    struct Lease {
        rent: i64,
        unit: Unit,
    }

    impl Filterable for Building {
        fn schema() -> &'static Schema {
            static SCHEMA: Schema = Schema {
                name: "Building",
                fields: &[FieldDef {
                    name: "city",
                    ty: TypeTag::String,
                    nullable: false,
                }],
            };
            &SCHEMA
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "city" => self.city.to_value(),
                _ => Value::None,
            }
        }
    }

    impl Filterable for Unit {
        fn schema() -> &'static Schema {
            static SCHEMA: Schema = Schema {
                name: "Unit",
                fields: &[
                    FieldDef {
                        name: "title",
                        ty: TypeTag::String,
                        nullable: false,
                    },
                    FieldDef {
                        name: "building",
                        ty: TypeTag::Record(<Building as Filterable>::schema),
                        nullable: true,
                    },
                ],
            };
            &SCHEMA
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "title" => self.title.to_value(),
                "building" => match &self.building {
                    Some(b) => Value::Record(b),
                    None => Value::None,
                },
                _ => Value::None,
            }
        }
    }

    impl Filterable for Lease {
        fn schema() -> &'static Schema {
            static SCHEMA: Schema = Schema {
                name: "Lease",
                fields: &[
                    FieldDef {
                        name: "rent",
                        ty: TypeTag::Int,
                        nullable: false,
                    },
                    FieldDef {
                        name: "unit",
                        ty: TypeTag::Record(<Unit as Filterable>::schema),
                        nullable: false,
                    },
                ],
            };
            &SCHEMA
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "rent" => self.rent.to_value(),
                "unit" => Value::Record(&self.unit),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn resolves_top_level_field() {
        let resolved = resolve::<Lease>("rent").unwrap();
        assert_eq!(resolved.path, vec!["rent"]);
        assert_eq!(resolved.declared_type, TypeTag::Int);
        assert!(!resolved.is_nullable);
    }

    #[test]
    fn resolves_nested_path() {
        let resolved = resolve::<Lease>("unit.title").unwrap();
        assert_eq!(resolved.dotted(), "unit.title");
        assert_eq!(resolved.declared_type, TypeTag::String);
        assert!(!resolved.is_nullable);
    }

    #[test]
    fn nullable_intermediate_makes_path_nullable() {
        let resolved = resolve::<Lease>("unit.building.city").unwrap();
        assert_eq!(resolved.declared_type, TypeTag::String);
        assert!(resolved.is_nullable);
    }

    #[test]
    fn unknown_segments_fail() {
        for path in ["", "Rent", "unit.", "unit.missing", "rent.value", "unit..title"] {
            let err = resolve::<Lease>(path).unwrap_err();
            assert_eq!(
                err,
                FilterError::UnknownProperty {
                    path: path.to_string(),
                    record: "Lease",
                },
                "path {path:?}"
            );
        }
    }

    #[test]
    fn read_follows_records_and_propagates_null() {
        let with_building = Lease {
            rent: 900,
            unit: Unit {
                title: "A1".to_string(),
                building: Some(Building {
                    city: "Shiraz".to_string(),
                }),
            },
        };
        let without_building = Lease {
            rent: 700,
            unit: Unit {
                title: "B2".to_string(),
                building: None,
            },
        };

        let city = resolve::<Lease>("unit.building.city").unwrap();
        assert_eq!(city.read(&with_building), Value::String("Shiraz"));
        assert_eq!(city.read(&without_building), Value::None);

        let title = resolve::<Lease>("unit.title").unwrap();
        assert_eq!(title.read(&without_building), Value::String("B2"));
    }
}
