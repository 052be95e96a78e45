//! Predicate trees.
//!
//! A compiled filter is a [`Predicate`]: boolean combinators over
//! [`Clause`]s, each of which reads one property path and applies a [`Test`].
//! The tree is plain data, so it can be inspected, cloned and shared across
//! threads.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::op::Op;
use crate::resolve::read_path;
use crate::traits::Filterable;
use crate::value::{Number, Value};

/// Owned value for storage in a clause.
///
/// Unlike [`Value`], which borrows from the source record, `ClauseValue`
/// owns its data so it can be stored in compiled predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    String(String),
    Number(Number),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    Enum(i64),
    Bool(bool),
}

impl ClauseValue {
    /// Compares a field value against this clause value with a comparison
    /// operator. Null and mismatched types never match.
    pub fn compare_with(&self, op: Op, field: &Value<'_>) -> bool {
        let ordering = match (field, self) {
            (Value::String(a), ClauseValue::String(b)) => Some((*a).cmp(b.as_str())),
            (Value::Number(a), ClauseValue::Number(b)) => a.compare(*b),
            (Value::Guid(a), ClauseValue::Guid(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), ClauseValue::DateTime(b)) => Some(a.cmp(b)),
            (Value::Enum(a), ClauseValue::Enum(b)) => Some(a.cmp(b)),
            (Value::Bool(a), ClauseValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        };
        ordering.is_some_and(|ordering| op.eval_ordering(ordering))
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<i64> for ClauseValue {
    fn from(n: i64) -> Self {
        ClauseValue::Number(Number::I64(n))
    }
}

/// How text operators compare letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Compare lowercased text.
    #[default]
    CaseInsensitive,
    /// Compare text as is.
    CaseSensitive,
}

impl TextMatch {
    /// Prepares a needle for matching, lowercasing it when needed.
    pub fn prepare(self, needle: &str) -> String {
        match self {
            TextMatch::CaseInsensitive => needle.to_lowercase(),
            TextMatch::CaseSensitive => needle.to_string(),
        }
    }
}

/// Kind of text match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOp {
    Contains,
    StartsWith,
    EndsWith,
}

/// Test applied to the value read from a property path.
#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    /// Value is null.
    Null,
    /// Value is null or an empty string.
    NullOrEmpty,
    /// Comparison (`Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`) against a value.
    Compare(Op, ClauseValue),
    /// Comparison of the date part only.
    CompareDate(Op, NaiveDate),
    /// Text match against a prepared needle.
    Text {
        op: TextOp,
        needle: String,
        mode: TextMatch,
    },
}

impl Test {
    /// Evaluates this test against a field value.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match self {
            Test::Null => value.is_none(),
            Test::NullOrEmpty => match value {
                Value::None => true,
                Value::String(s) => s.is_empty(),
                _ => false,
            },
            Test::Compare(op, expected) => expected.compare_with(*op, value),
            Test::CompareDate(op, expected) => match value {
                Value::DateTime(t) => op.eval_ordering(t.date().cmp(expected)),
                _ => false,
            },
            Test::Text { op, needle, mode } => match value {
                Value::String(s) => match_text(s, *op, needle, *mode),
                _ => false,
            },
        }
    }
}

fn match_text(haystack: &str, op: TextOp, needle: &str, mode: TextMatch) -> bool {
    let folded;
    let haystack = match mode {
        TextMatch::CaseInsensitive => {
            folded = haystack.to_lowercase();
            folded.as_str()
        }
        TextMatch::CaseSensitive => haystack,
    };
    match op {
        TextOp::Contains => haystack.contains(needle),
        TextOp::StartsWith => haystack.starts_with(needle),
        TextOp::EndsWith => haystack.ends_with(needle),
    }
}

/// A single test bound to a property path.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Field names from the root record to the tested field.
    pub path: Vec<&'static str>,
    pub test: Test,
}

impl Clause {
    pub fn new(path: Vec<&'static str>, test: Test) -> Self {
        Clause { path, test }
    }

    /// Evaluates this clause against a record.
    pub fn matches(&self, record: &dyn Filterable) -> bool {
        self.test.matches(&read_path(record, &self.path))
    }
}

/// Boolean combination of clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record.
    True,
    /// Matches no record.
    False,
    Clause(Clause),
    /// All children must match; empty matches everything.
    And(Vec<Predicate>),
    /// At least one child must match; empty matches nothing.
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn clause(path: Vec<&'static str>, test: Test) -> Self {
        Predicate::Clause(Clause::new(path, test))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Evaluates this predicate against a record.
    pub fn evaluate(&self, record: &dyn Filterable) -> bool {
        match self {
            Predicate::True => true,
            Predicate::False => false,
            Predicate::Clause(clause) => clause.matches(record),
            Predicate::And(children) => children.iter().all(|child| child.evaluate(record)),
            Predicate::Or(children) => children.iter().any(|child| child.evaluate(record)),
            Predicate::Not(inner) => !inner.evaluate(record),
        }
    }

    /// Returns the number of clauses in this tree.
    pub fn clause_count(&self) -> usize {
        match self {
            Predicate::True | Predicate::False => 0,
            Predicate::Clause(_) => 1,
            Predicate::And(children) | Predicate::Or(children) => {
                children.iter().map(Predicate::clause_count).sum()
            }
            Predicate::Not(inner) => inner.clause_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(op: TextOp, needle: &str, mode: TextMatch) -> Test {
        Test::Text {
            op,
            needle: mode.prepare(needle),
            mode,
        }
    }

    #[test]
    fn compare_numbers() {
        let ten = ClauseValue::Number(Number::I64(10));
        assert!(ten.compare_with(Op::Eq, &Value::Number(Number::I64(10))));
        assert!(ten.compare_with(Op::Eq, &Value::Number(Number::F64(10.0))));
        assert!(ten.compare_with(Op::Gt, &Value::Number(Number::U64(11))));
        assert!(!ten.compare_with(Op::Gt, &Value::Number(Number::I64(10))));
        assert!(ten.compare_with(Op::Lte, &Value::Number(Number::I64(10))));
        assert!(!ten.compare_with(Op::Ne, &Value::Number(Number::I64(10))));
    }

    #[test]
    fn compare_never_matches_null_or_mismatch() {
        let ten = ClauseValue::Number(Number::I64(10));
        assert!(!ten.compare_with(Op::Eq, &Value::None));
        assert!(!ten.compare_with(Op::Ne, &Value::None));
        assert!(!ten.compare_with(Op::Eq, &Value::String("10")));
    }

    #[test]
    fn compare_strings_is_exact() {
        let name = ClauseValue::from("Alice");
        assert!(name.compare_with(Op::Eq, &Value::String("Alice")));
        assert!(!name.compare_with(Op::Eq, &Value::String("alice")));
        assert!(name.compare_with(Op::Ne, &Value::String("Bob")));
    }

    #[test]
    fn null_tests() {
        assert!(Test::Null.matches(&Value::None));
        assert!(!Test::Null.matches(&Value::String("")));
        assert!(Test::NullOrEmpty.matches(&Value::String("")));
        assert!(Test::NullOrEmpty.matches(&Value::None));
        assert!(!Test::NullOrEmpty.matches(&Value::String(" ")));
        assert!(!Test::NullOrEmpty.matches(&Value::Bool(false)));
    }

    #[test]
    fn date_only_comparison_ignores_time() {
        let test = Test::CompareDate(Op::Eq, date(2024, 2, 29));
        let morning = date(2024, 2, 29).and_hms_opt(8, 0, 0).unwrap();
        let evening = date(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap();
        let next = date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap();

        assert!(test.matches(&Value::DateTime(morning)));
        assert!(test.matches(&Value::DateTime(evening)));
        assert!(!test.matches(&Value::DateTime(next)));
        assert!(!test.matches(&Value::None));
    }

    #[test]
    fn text_matching_modes() {
        let insensitive = text(TextOp::Contains, "LLO", TextMatch::CaseInsensitive);
        assert!(insensitive.matches(&Value::String("Hello")));
        assert!(!insensitive.matches(&Value::None));

        let sensitive = text(TextOp::Contains, "LLO", TextMatch::CaseSensitive);
        assert!(!sensitive.matches(&Value::String("Hello")));
        assert!(sensitive.matches(&Value::String("HELLO")));

        let prefix = text(TextOp::StartsWith, "he", TextMatch::CaseInsensitive);
        assert!(prefix.matches(&Value::String("Hello")));
        assert!(!prefix.matches(&Value::String("Oh hello")));

        let suffix = text(TextOp::EndsWith, "WORLD", TextMatch::CaseInsensitive);
        assert!(suffix.matches(&Value::String("hello world")));
        assert!(!suffix.matches(&Value::String("world!")));
    }

    #[test]
    fn text_tests_ignore_non_strings() {
        let test = text(TextOp::Contains, "1", TextMatch::CaseInsensitive);
        assert!(!test.matches(&Value::Number(Number::I64(1))));
    }

    #[test]
    fn combinators_on_empty_children() {
        struct Nothing;
        impl Filterable for Nothing {
            fn schema() -> &'static crate::schema::Schema {
                static SCHEMA: crate::schema::Schema = crate::schema::Schema {
                    name: "Nothing",
                    fields: &[],
                };
                &SCHEMA
            }
            fn field_value(&self, _field: &str) -> Value<'_> {
                Value::None
            }
        }

        assert!(Predicate::And(vec![]).evaluate(&Nothing));
        assert!(!Predicate::Or(vec![]).evaluate(&Nothing));
        assert!(Predicate::True.evaluate(&Nothing));
        assert!(!Predicate::False.evaluate(&Nothing));
        assert!(Predicate::False.not().evaluate(&Nothing));

        let null_check = Predicate::clause(vec!["anything"], Test::Null);
        assert!(null_check.evaluate(&Nothing));
        assert_eq!(
            Predicate::Or(vec![null_check.clone(), null_check.not()]).clause_count(),
            2
        );
    }
}
