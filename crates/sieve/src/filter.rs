//! Filter conditions and their compilation into a [`CompiledFilter`].
//!
//! Conditions are grouped by property name in order of first appearance.
//! Conditions in one group combine with that group's logic (taken from the
//! group's first condition, `and` unless it says `or`), and groups always
//! combine with AND:
//!
//! ```text
//! filter = group(name) ∧ group(price) ∧ ...
//! group  = c1 ∘ c2 ∘ ...        where ∘ is ∧ or ∨
//! ```
//!
//! Conditions that cannot be compiled are dropped, never reported as errors.
//! They are listed by [`CompiledFilter::skipped`].

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::{build, BuildContext};
use crate::clause::Predicate;
use crate::error::Skip;
use crate::op::Op;
use crate::resolve::resolve;
use crate::traits::Filterable;

/// One client-supplied filter condition.
///
/// Deserializes from camelCase JSON (`propertyName`), snake_case keys are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// Dotted property path, e.g. `"unit.title"`.
    #[serde(alias = "property_name", alias = "property")]
    pub property_name: String,
    /// Operator tag, e.g. `"contains"`.
    #[serde(alias = "operator", alias = "op")]
    pub operation: String,
    #[serde(default)]
    pub value: Option<String>,
    /// Upper bound for `between` and `notbetween`.
    #[serde(default)]
    pub value2: Option<String>,
    /// `"and"` or `"or"`, for the group of conditions on this property.
    #[serde(default)]
    pub logic: Option<String>,
}

impl FilterCondition {
    /// Creates a condition with a single value.
    pub fn new(
        property_name: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        FilterCondition {
            property_name: property_name.into(),
            operation: operation.into(),
            value: Some(value.into()),
            ..FilterCondition::default()
        }
    }

    /// Creates a condition without a value (`isempty`, `isnotempty`).
    pub fn unary(property_name: impl Into<String>, operation: impl Into<String>) -> Self {
        FilterCondition {
            property_name: property_name.into(),
            operation: operation.into(),
            ..FilterCondition::default()
        }
    }

    /// Creates a range condition (`between`, `notbetween`).
    pub fn range(
        property_name: impl Into<String>,
        operation: impl Into<String>,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        FilterCondition {
            value2: Some(high.into()),
            ..FilterCondition::new(property_name, operation, low)
        }
    }

    /// Sets the group logic.
    pub fn with_logic(mut self, logic: impl Into<String>) -> Self {
        self.logic = Some(logic.into());
        self
    }

    /// Returns the parsed group logic.
    pub fn group_logic(&self) -> Logic {
        Logic::parse(self.logic.as_deref())
    }
}

/// How conditions on the same property combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    /// `"or"` (any case, surrounding whitespace ignored) is OR; everything
    /// else, including no value, is AND.
    pub fn parse(raw: Option<&str>) -> Logic {
        match raw {
            Some(raw) if raw.trim().eq_ignore_ascii_case("or") => Logic::Or,
            _ => Logic::And,
        }
    }

    fn combine(self, mut predicates: Vec<Predicate>) -> Option<Predicate> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(match self {
                Logic::And => Predicate::And(predicates),
                Logic::Or => Predicate::Or(predicates),
            }),
        }
    }
}

/// A condition that was dropped during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCondition {
    /// Position of the condition in the input.
    pub index: usize,
    pub property_name: String,
    pub reason: Skip,
}

/// Compiled filter for records of type `T`.
///
/// The predicate is immutable; a compiled filter can be cloned cheaply
/// and shared between threads.
pub struct CompiledFilter<T> {
    predicate: Predicate,
    skipped: Vec<SkippedCondition>,
    _record: PhantomData<fn(&T) -> bool>,
}

impl<T> CompiledFilter<T> {
    /// Wraps an already built predicate.
    pub fn from_predicate(predicate: Predicate) -> Self {
        CompiledFilter {
            predicate,
            skipped: Vec::new(),
            _record: PhantomData,
        }
    }

    /// A filter that accepts every record.
    pub fn always() -> Self {
        CompiledFilter::from_predicate(Predicate::True)
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn into_predicate(self) -> Predicate {
        self.predicate
    }

    /// Conditions dropped during compilation, in input order.
    pub fn skipped(&self) -> &[SkippedCondition] {
        &self.skipped
    }

    /// Returns `true` if this filter accepts every record.
    pub fn is_always_true(&self) -> bool {
        matches!(self.predicate, Predicate::True)
    }
}

impl<T: Filterable> CompiledFilter<T> {
    /// Tests a single record.
    pub fn matches(&self, record: &T) -> bool {
        self.predicate.evaluate(record)
    }

    /// Converts this filter into a plain closure.
    pub fn into_fn(self) -> impl Fn(&T) -> bool + Send + Sync + Clone {
        let predicate = self.predicate;
        move |record: &T| predicate.evaluate(record)
    }
}

impl<T> Clone for CompiledFilter<T> {
    fn clone(&self) -> Self {
        CompiledFilter {
            predicate: self.predicate.clone(),
            skipped: self.skipped.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CompiledFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("predicate", &self.predicate)
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl<T> Default for CompiledFilter<T> {
    fn default() -> Self {
        CompiledFilter::always()
    }
}

struct Group<'a> {
    property_name: &'a str,
    logic: Logic,
    predicates: Vec<Predicate>,
}

/// Compiles conditions against `T`.
pub(crate) fn compile<T: Filterable>(
    conditions: &[FilterCondition],
    ctx: &BuildContext<'_>,
) -> CompiledFilter<T> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut skipped = Vec::new();

    for (index, condition) in conditions.iter().enumerate() {
        let position = match groups
            .iter()
            .position(|group| group.property_name == condition.property_name)
        {
            Some(position) => position,
            None => {
                groups.push(Group {
                    property_name: &condition.property_name,
                    logic: condition.group_logic(),
                    predicates: Vec::new(),
                });
                groups.len() - 1
            }
        };

        match compile_condition::<T>(condition, ctx) {
            Ok(predicate) => groups[position].predicates.push(predicate),
            Err(reason) => {
                debug!(
                    index,
                    property = %condition.property_name,
                    op = %condition.operation,
                    reason = %reason,
                    "skipping filter condition"
                );
                skipped.push(SkippedCondition {
                    index,
                    property_name: condition.property_name.clone(),
                    reason,
                });
            }
        }
    }

    let group_count = groups.len();
    let mut conjuncts: Vec<Predicate> = groups
        .into_iter()
        .filter_map(|group| group.logic.combine(group.predicates))
        .collect();

    let predicate = match conjuncts.len() {
        0 => Predicate::True,
        1 => conjuncts.remove(0),
        _ => Predicate::And(conjuncts),
    };

    debug!(
        record = T::schema().name,
        conditions = conditions.len(),
        groups = group_count,
        skipped = skipped.len(),
        "compiled filter"
    );

    CompiledFilter {
        predicate,
        skipped,
        _record: PhantomData,
    }
}

fn compile_condition<T: Filterable>(
    condition: &FilterCondition,
    ctx: &BuildContext<'_>,
) -> Result<Predicate, Skip> {
    let property = resolve::<T>(&condition.property_name)
        .map_err(|_| Skip::UnknownProperty(condition.property_name.clone()))?;
    let op = Op::parse(&condition.operation)
        .ok_or_else(|| Skip::UnknownOperator(condition.operation.clone()))?;
    build(
        &property,
        op,
        condition.value.as_deref(),
        condition.value2.as_deref(),
        ctx,
    )
}
