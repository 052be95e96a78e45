//! Error types for the sieve crate.
//!
//! Two policies live side by side. Ordering problems are returned as
//! [`FilterError`] and abort compilation. Filtering problems never surface as
//! errors: each offending condition is dropped with a [`Skip`] reason that is
//! recorded on the compiled filter.

use thiserror::Error;

/// Errors that abort compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A dotted path does not name a field of the record type.
    #[error("unknown property '{path}' on {record}")]
    UnknownProperty { path: String, record: &'static str },

    /// The property exists but its values cannot be ordered.
    #[error("property '{path}' of type {ty} cannot be used as a sort key")]
    NotSortable { path: String, ty: &'static str },
}

/// Failure to convert a textual value into a typed clause value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// No value was supplied.
    #[error("value is empty")]
    Empty,

    /// The text does not parse as the expected type.
    #[error("'{value}' is not a valid {expected} value")]
    Invalid {
        value: String,
        expected: &'static str,
    },

    /// The type has no textual form at all (nested records).
    #[error("{ty} values cannot be compared to text")]
    NotCoercible { ty: &'static str },
}

/// Reason a single filter condition contributes nothing to the predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("operator requires a value")]
    MissingValue,

    #[error("range operator requires a second value")]
    MissingSecondValue,

    #[error("value rejected: {0}")]
    Coercion(#[from] CoercionError),

    /// The operator is defined, but not for the property's type.
    #[error("operator '{op}' does not apply to {ty} properties")]
    NotApplicable { op: &'static str, ty: &'static str },
}

/// Result type for sieve operations.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = FilterError::UnknownProperty {
            path: "unit.titel".to_string(),
            record: "Lease",
        };
        assert_eq!(err.to_string(), "unknown property 'unit.titel' on Lease");

        let skip = Skip::Coercion(CoercionError::Invalid {
            value: "abc".to_string(),
            expected: "int",
        });
        assert_eq!(skip.to_string(), "value rejected: 'abc' is not a valid int value");
    }

    #[test]
    fn coercion_errors_convert() {
        let skip: Skip = CoercionError::NotCoercible { ty: "record" }.into();
        assert!(matches!(skip, Skip::Coercion(_)));
    }
}
