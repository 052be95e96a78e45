//! Builds one predicate from one resolved filter condition.

use crate::clause::{ClauseValue, Predicate, Test, TextMatch, TextOp};
use crate::coerce::coerce;
use crate::error::Skip;
use crate::labels::{match_by_label, LabelProvider};
use crate::op::Op;
use crate::resolve::ResolvedProperty;
use crate::schema::TypeTag;

/// Settings the builder reads while turning conditions into predicates.
#[derive(Clone, Copy)]
pub struct BuildContext<'c> {
    pub labels: &'c dyn LabelProvider,
    pub text_match: TextMatch,
}

/// Builds the predicate for `op` applied to `property`.
///
/// `value` is required by every operator except `IsEmpty`/`IsNotEmpty`, and
/// `value2` by the range operators. Any condition that cannot be turned into
/// a meaningful predicate returns the [`Skip`] reason instead.
pub fn build(
    property: &ResolvedProperty,
    op: Op,
    value: Option<&str>,
    value2: Option<&str>,
    ctx: &BuildContext<'_>,
) -> Result<Predicate, Skip> {
    let ty = property.declared_type;
    let clause = |test| Predicate::clause(property.path.clone(), test);

    if op.is_null_check() {
        let test = if ty.is_string() {
            Test::NullOrEmpty
        } else {
            Test::Null
        };
        return Ok(match op {
            Op::IsNotEmpty => clause(test).not(),
            _ => clause(test),
        });
    }

    let raw = match value {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(Skip::MissingValue),
    };

    if let (Some(descriptor), Op::Contains | Op::Eq) = (ty.as_enum(), op) {
        let values = match_by_label(descriptor, ctx.labels, raw);
        let mut alternatives: Vec<Predicate> = values
            .into_iter()
            .map(|v| clause(Test::Compare(Op::Eq, ClauseValue::Enum(v))))
            .collect();
        return Ok(match alternatives.len() {
            0 => Predicate::False,
            1 => alternatives.remove(0),
            _ => Predicate::Or(alternatives),
        });
    }

    let not_applicable = || Skip::NotApplicable {
        op: op.as_str(),
        ty: ty.name(),
    };

    if op.is_string_op() {
        if !ty.is_string() {
            return Err(not_applicable());
        }
        let text = |text_op| Test::Text {
            op: text_op,
            needle: ctx.text_match.prepare(raw),
            mode: ctx.text_match,
        };
        return Ok(match op {
            Op::Contains => clause(text(TextOp::Contains)),
            Op::StartsWith => clause(text(TextOp::StartsWith)),
            Op::EndsWith => clause(text(TextOp::EndsWith)),
            _ => Predicate::Or(vec![
                clause(Test::Null),
                clause(text(TextOp::Contains)).not(),
            ]),
        });
    }

    if (op.is_ordering_op() || op.is_range_op()) && !ty.is_ordered() {
        return Err(not_applicable());
    }

    let first = coerce(raw, &ty)?;

    match op {
        Op::Eq => Ok(clause(equality_test(Op::Eq, &ty, first))),
        Op::Ne => Ok(Predicate::Or(vec![
            clause(equality_test(Op::Ne, &ty, first)),
            clause(Test::Null),
        ])),
        Op::Between | Op::NotBetween => {
            let raw2 = match value2 {
                Some(raw2) if !raw2.is_empty() => raw2,
                _ => return Err(Skip::MissingSecondValue),
            };
            let second = coerce(raw2, &ty)?;
            let range = Predicate::And(vec![
                clause(Test::Compare(Op::Gte, first)),
                clause(Test::Compare(Op::Lte, second)),
            ]);
            Ok(match op {
                Op::NotBetween => range.not(),
                _ => range,
            })
        }
        _ => Ok(clause(Test::Compare(op, first))),
    }
}

/// Equality on date/times compares calendar dates only.
fn equality_test(op: Op, ty: &TypeTag, value: ClauseValue) -> Test {
    match (ty, value) {
        (TypeTag::DateTime, ClauseValue::DateTime(t)) => Test::CompareDate(op, t.date()),
        (_, value) => Test::Compare(op, value),
    }
}
