//! Filter operators.
//!
//! The [`Op`] enum is the closed set of operator tags a filter condition may
//! carry. Tags arrive as loose text (`" Contains "`, `"EQUALS"`) and are parsed
//! once with [`Op::parse`]; unknown tags never reach the predicate builder.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::Skip;

/// Operator of a filter condition.
///
/// Operators are grouped by the types they support:
/// - **Text**: `Contains`, `NotContains`, `StartsWith`, `EndsWith`
/// - **Universal**: `Eq`, `Ne`, `IsEmpty`, `IsNotEmpty`
/// - **Ordered** (numbers, decimals, date/times): `Gt`, `Gte`, `Lt`, `Lte`,
///   `Between`, `NotBetween`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Substring match. Accepts the tag `contains`.
    Contains,
    /// Negated substring match; null values pass.
    NotContains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,

    /// Equality. Accepts `eq` and `equals`.
    Eq,
    /// Inequality; null values pass. Accepts `neq` and `notequals`.
    Ne,

    /// Greater than. Accepts `gt` and `after`.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than. Accepts `lt` and `before`.
    Lt,
    /// Less than or equal.
    Lte,

    /// Inclusive range, needs a second value.
    Between,
    /// Complement of `Between`.
    NotBetween,

    /// Null check (null or empty for strings).
    IsEmpty,
    /// Complement of `IsEmpty`.
    IsNotEmpty,
}

impl Op {
    /// Parses an operator tag, ignoring case and surrounding whitespace.
    ///
    /// ```
    /// use sieve::Op;
    ///
    /// assert_eq!(Op::parse(" Equals "), Some(Op::Eq));
    /// assert_eq!(Op::parse("before"), Some(Op::Lt));
    /// assert_eq!(Op::parse("like"), None);
    /// ```
    pub fn parse(tag: &str) -> Option<Op> {
        let op = match tag.trim().to_ascii_lowercase().as_str() {
            "contains" => Op::Contains,
            "notcontains" => Op::NotContains,
            "startswith" => Op::StartsWith,
            "endswith" => Op::EndsWith,
            "eq" | "equals" => Op::Eq,
            "neq" | "notequals" => Op::Ne,
            "gt" | "after" => Op::Gt,
            "gte" => Op::Gte,
            "lt" | "before" => Op::Lt,
            "lte" => Op::Lte,
            "between" => Op::Between,
            "notbetween" => Op::NotBetween,
            "isempty" => Op::IsEmpty,
            "isnotempty" => Op::IsNotEmpty,
            _ => return None,
        };
        Some(op)
    }

    /// Returns `true` if this operator only applies to string properties.
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            Op::Contains | Op::NotContains | Op::StartsWith | Op::EndsWith
        )
    }

    /// Returns `true` if this operator needs an ordered property type.
    pub fn is_ordering_op(self) -> bool {
        matches!(
            self,
            Op::Gt | Op::Gte | Op::Lt | Op::Lte | Op::Between | Op::NotBetween
        )
    }

    /// Returns `true` for `Between` and `NotBetween`.
    pub fn is_range_op(self) -> bool {
        matches!(self, Op::Between | Op::NotBetween)
    }

    /// Returns `true` for the null checks, the only operators that take no value.
    pub fn is_null_check(self) -> bool {
        matches!(self, Op::IsEmpty | Op::IsNotEmpty)
    }

    /// Evaluates a comparison given an ordering result.
    ///
    /// Only the six comparison operators are ordering based; every other
    /// operator yields `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the canonical tag of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Contains => "contains",
            Op::NotContains => "notcontains",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Eq => "eq",
            Op::Ne => "neq",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Between => "between",
            Op::NotBetween => "notbetween",
            Op::IsEmpty => "isempty",
            Op::IsNotEmpty => "isnotempty",
        }
    }
}

impl FromStr for Op {
    type Err = Skip;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Op::parse(s).ok_or_else(|| Skip::UnknownOperator(s.to_string()))
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
