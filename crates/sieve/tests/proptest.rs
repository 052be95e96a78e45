//! Property-based tests for filter and order compilation using proptest.

use proptest::prelude::*;
use sieve::{
    compile_filter, compile_order, FieldDef, FilterCondition, Filterable, Number, OrderSpec,
    PageRequest, Query, Schema, TypeTag, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct TestItem {
    value: i64,
    name: Option<String>,
    active: bool,
}

impl Filterable for TestItem {
    fn schema() -> &'static Schema {
        static SCHEMA: Schema = Schema {
            name: "TestItem",
            fields: &[
                FieldDef {
                    name: "value",
                    ty: TypeTag::Int,
                    nullable: false,
                },
                FieldDef {
                    name: "name",
                    ty: TypeTag::String,
                    nullable: true,
                },
                FieldDef {
                    name: "active",
                    ty: TypeTag::Bool,
                    nullable: false,
                },
            ],
        };
        &SCHEMA
    }

    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "value" => Value::Number(Number::I64(self.value)),
            "name" => match &self.name {
                Some(name) => Value::String(name),
                None => Value::None,
            },
            "active" => Value::Bool(self.active),
            _ => Value::None,
        }
    }
}

// Strategy to generate test items
fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (
        -1000i64..1000,
        prop::option::of("[a-zA-Z]{0,8}"),
        any::<bool>(),
    )
        .prop_map(|(value, name, active)| TestItem {
            value,
            name,
            active,
        })
}

fn items_strategy(max: usize) -> impl Strategy<Value = Vec<TestItem>> {
    prop::collection::vec(test_item_strategy(), 0..max)
}

fn matching(items: &[TestItem], conditions: &[FilterCondition]) -> Vec<i64> {
    let filter = compile_filter::<TestItem>(conditions);
    items
        .iter()
        .filter(|item| filter.matches(item))
        .map(|item| item.value)
        .collect()
}

// ============================================================================
// Filter properties
// ============================================================================

proptest! {
    /// Filter should never return more items than the input.
    #[test]
    fn filter_never_grows_collection(
        items in items_strategy(100),
        threshold in any::<i64>(),
    ) {
        let query = Query::new().with_filter(compile_filter::<TestItem>(&[
            FilterCondition::new("value", "gt", threshold.to_string()),
        ]));

        let results = query.filter(&items);
        prop_assert!(results.len() <= items.len());
    }

    /// Count should equal the length of filtered results.
    #[test]
    fn count_equals_filter_len(
        items in items_strategy(100),
        threshold in -1000i64..1000,
    ) {
        let query = Query::new().with_filter(compile_filter::<TestItem>(&[
            FilterCondition::new("value", "gte", threshold.to_string()),
        ]));

        prop_assert_eq!(query.filter(&items).len(), query.count(&items));
        prop_assert_eq!(query.any(&items), query.count(&items) > 0);
    }

    /// An empty condition list matches every item.
    #[test]
    fn empty_conditions_match_all(items in items_strategy(50)) {
        prop_assert_eq!(matching(&items, &[]).len(), items.len());
    }

    /// `between` agrees with an inclusive range check.
    #[test]
    fn between_matches_manual_check(
        items in items_strategy(100),
        low in -1000i64..1000,
        high in -1000i64..1000,
    ) {
        let found = matching(
            &items,
            &[FilterCondition::range("value", "between", low.to_string(), high.to_string())],
        );
        let expected: Vec<i64> = items
            .iter()
            .map(|item| item.value)
            .filter(|v| low <= *v && *v <= high)
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// `notbetween` selects exactly the items `between` rejects.
    #[test]
    fn notbetween_is_complement(
        items in items_strategy(100),
        low in -1000i64..1000,
        high in -1000i64..1000,
    ) {
        let inside = compile_filter::<TestItem>(&[
            FilterCondition::range("value", "between", low.to_string(), high.to_string()),
        ]);
        let outside = compile_filter::<TestItem>(&[
            FilterCondition::range("value", "notbetween", low.to_string(), high.to_string()),
        ]);
        for item in &items {
            prop_assert_ne!(inside.matches(item), outside.matches(item));
        }
    }

    /// `gt` and `lte` on a non-null field partition the items.
    #[test]
    fn gt_and_lte_partition(
        items in items_strategy(100),
        threshold in -1000i64..1000,
    ) {
        let above = matching(&items, &[FilterCondition::new("value", "gt", threshold.to_string())]);
        let below = matching(&items, &[FilterCondition::new("value", "lte", threshold.to_string())]);
        prop_assert_eq!(above.len() + below.len(), items.len());
    }

    /// `isempty` and `isnotempty` partition the items.
    #[test]
    fn null_checks_partition(items in items_strategy(100)) {
        let empty = matching(&items, &[FilterCondition::unary("name", "isempty")]);
        let filled = matching(&items, &[FilterCondition::unary("name", "isnotempty")]);
        prop_assert_eq!(empty.len() + filled.len(), items.len());

        let expected = items
            .iter()
            .filter(|item| item.name.as_deref().map_or(true, str::is_empty))
            .count();
        prop_assert_eq!(empty.len(), expected);
    }

    /// `contains` is a case-insensitive substring test; nulls never match.
    #[test]
    fn contains_ignores_case(
        items in items_strategy(100),
        needle in "[a-zA-Z]{1,3}",
    ) {
        let found = matching(&items, &[FilterCondition::new("name", "contains", needle.clone())]);
        let lowered = needle.to_lowercase();
        let expected: Vec<i64> = items
            .iter()
            .filter(|item| {
                item.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&lowered))
            })
            .map(|item| item.value)
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Conditions on the same property joined with `or` accept the union.
    #[test]
    fn or_group_is_union(
        items in items_strategy(100),
        a in -1000i64..1000,
        b in -1000i64..1000,
    ) {
        let found = matching(
            &items,
            &[
                FilterCondition::new("value", "lt", a.to_string()).with_logic("or"),
                FilterCondition::new("value", "gt", b.to_string()),
            ],
        );
        let expected: Vec<i64> = items
            .iter()
            .map(|item| item.value)
            .filter(|v| *v < a || *v > b)
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Arbitrary operator tags never panic; unknown ones are skipped.
    #[test]
    fn arbitrary_operators_never_panic(
        items in items_strategy(20),
        op in "[a-z ]{0,12}",
        value in ".{0,6}",
    ) {
        let filter = compile_filter::<TestItem>(&[FilterCondition::new("name", op.clone(), value)]);
        if sieve::Op::parse(&op).is_none() {
            prop_assert_eq!(filter.skipped().len(), 1);
            prop_assert!(filter.is_always_true());
        }
        for item in &items {
            let _ = filter.matches(item);
        }
    }

    /// Compiling the same conditions twice yields equal predicates.
    #[test]
    fn compilation_is_deterministic(
        threshold in any::<i64>(),
        needle in "[a-z]{1,4}",
    ) {
        let conditions = [
            FilterCondition::new("value", "gte", threshold.to_string()),
            FilterCondition::new("name", "startswith", needle.clone()).with_logic("or"),
            FilterCondition::new("name", "endswith", needle),
            FilterCondition::new("active", "eq", "true"),
        ];
        let first = compile_filter::<TestItem>(&conditions);
        let second = compile_filter::<TestItem>(&conditions);
        prop_assert_eq!(first.predicate(), second.predicate());
    }
}

// ============================================================================
// Order properties
// ============================================================================

proptest! {
    /// Sorting is a permutation and orders by the key.
    #[test]
    fn sort_orders_and_preserves_items(
        items in items_strategy(100),
        descending in any::<bool>(),
    ) {
        let spec = if descending { OrderSpec::desc("value") } else { OrderSpec::asc("value") };
        let order = compile_order::<TestItem>(&[spec]).unwrap();

        let mut sorted = items.clone();
        order.sort(&mut sorted);

        let mut expected: Vec<i64> = items.iter().map(|item| item.value).collect();
        expected.sort_unstable();
        if descending {
            expected.reverse();
        }
        let actual: Vec<i64> = sorted.iter().map(|item| item.value).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Null names sort after every present name, in both directions.
    #[test]
    fn sort_keeps_nulls_last(
        items in items_strategy(100),
        descending in any::<bool>(),
    ) {
        let spec = OrderSpec {
            property_name: "name".to_string(),
            descending,
        };
        let mut sorted = items.clone();
        compile_order::<TestItem>(&[spec]).unwrap().sort(&mut sorted);

        let first_null = sorted
            .iter()
            .position(|item| item.name.is_none())
            .unwrap_or(sorted.len());
        prop_assert!(sorted[first_null..].iter().all(|item| item.name.is_none()));

        let keys: Vec<String> = sorted[..first_null]
            .iter()
            .filter_map(|item| item.name.as_deref().map(str::to_lowercase))
            .collect();
        for pair in keys.windows(2) {
            if descending {
                prop_assert!(pair[0] >= pair[1]);
            } else {
                prop_assert!(pair[0] <= pair[1]);
            }
        }
    }

    /// Sorting is stable: ties keep their input order.
    #[test]
    fn sort_is_stable(items in items_strategy(100)) {
        let indexed: Vec<TestItem> = items
            .iter()
            .enumerate()
            .map(|(i, item)| TestItem {
                value: i as i64,
                ..item.clone()
            })
            .collect();
        let mut sorted = indexed.clone();
        compile_order::<TestItem>(&[OrderSpec::asc("active")])
            .unwrap()
            .sort(&mut sorted);

        for pair in sorted.windows(2) {
            if pair[0].active == pair[1].active {
                prop_assert!(pair[0].value < pair[1].value);
            }
        }
    }

    /// Pages cover the matches without overlap.
    #[test]
    fn pages_partition_matches(
        items in items_strategy(60),
        page_size in 1usize..15,
    ) {
        let query = Query::new()
            .with_order(compile_order::<TestItem>(&[OrderSpec::asc("value")]).unwrap());
        let all: Vec<i64> = query.filter(&items).iter().map(|item| item.value).collect();

        let first = query.page(&items, PageRequest::new(1, page_size));
        let mut collected: Vec<i64> = Vec::new();
        for page in 1..=first.total_pages() {
            let window = query.page(&items, PageRequest::new(page, page_size));
            prop_assert!(window.items.len() <= page_size);
            collected.extend(window.items.iter().map(|item| item.value));
        }
        prop_assert_eq!(first.total, items.len());
        prop_assert_eq!(collected, all);
    }
}
