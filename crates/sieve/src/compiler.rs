//! Compilation settings.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::builder::BuildContext;
use crate::clause::TextMatch;
use crate::collation::{Collation, FoldedCollation};
use crate::error::Result;
use crate::filter::{self, CompiledFilter, FilterCondition};
use crate::labels::{DeclaredLabels, LabelProvider};
use crate::ordering::{CompiledOrder, OrderSpec};
use crate::query::Query;
use crate::request::SearchRequest;
use crate::traits::Filterable;

/// Compiles filter conditions and sort keys for any record type.
///
/// A `Compiler` only holds settings; it is cheap to clone and can be shared
/// between threads.
///
/// ```
/// use std::sync::Arc;
/// use sieve::{Compiler, OrdinalCollation, TextMatch};
///
/// let compiler = Compiler::new()
///     .with_collation(Arc::new(OrdinalCollation))
///     .text_match(TextMatch::CaseSensitive);
/// assert_eq!(compiler.text_matching(), TextMatch::CaseSensitive);
/// ```
#[derive(Clone)]
pub struct Compiler {
    labels: Arc<dyn LabelProvider>,
    collation: Arc<dyn Collation>,
    text_match: TextMatch,
}

impl Compiler {
    /// Creates a compiler with declared enum labels, folded collation and
    /// case-insensitive text matching.
    pub fn new() -> Self {
        Compiler {
            labels: Arc::new(DeclaredLabels),
            collation: Arc::new(FoldedCollation),
            text_match: TextMatch::default(),
        }
    }

    /// Sets the provider used to search enum properties by label.
    pub fn with_labels(mut self, labels: Arc<dyn LabelProvider>) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the collation used for string sort keys.
    pub fn with_collation(mut self, collation: Arc<dyn Collation>) -> Self {
        self.collation = collation;
        self
    }

    /// Sets how text operators compare letters.
    pub fn text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    pub fn text_matching(&self) -> TextMatch {
        self.text_match
    }

    pub fn labels(&self) -> &dyn LabelProvider {
        self.labels.as_ref()
    }

    pub fn collation(&self) -> &dyn Collation {
        self.collation.as_ref()
    }

    /// Compiles filter conditions against `T`.
    ///
    /// Never fails: conditions that cannot be compiled are left out and
    /// reported by [`CompiledFilter::skipped`].
    pub fn compile_filter<T: Filterable>(
        &self,
        conditions: &[FilterCondition],
    ) -> CompiledFilter<T> {
        let ctx = BuildContext {
            labels: self.labels.as_ref(),
            text_match: self.text_match,
        };
        filter::compile(conditions, &ctx)
    }

    /// Compiles sort keys against `T`, stopping at the first bad key.
    pub fn compile_order<T: Filterable>(&self, specs: &[OrderSpec]) -> Result<CompiledOrder<T>> {
        let order = specs.iter().try_fold(
            CompiledOrder::with_collation(Arc::clone(&self.collation)),
            |order, spec| order.then_by_spec(spec),
        )?;
        debug!(
            record = T::schema().name,
            keys = order.len(),
            "compiled order"
        );
        Ok(order)
    }

    /// Compiles a whole search request into a query.
    pub fn compile_request<T: Filterable>(&self, request: &SearchRequest) -> Result<Query<T>> {
        let filter = self.compile_filter(&request.filters);
        let order = self.compile_order(&request.sort)?;
        let mut query = Query::new().with_filter(filter).with_order(order);
        if let Some(page) = request.page_request() {
            query = query.paged(page);
        }
        Ok(query)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("collation", &self.collation)
            .field("text_match", &self.text_match)
            .finish_non_exhaustive()
    }
}

/// Compiles filter conditions with the default [`Compiler`].
pub fn compile_filter<T: Filterable>(conditions: &[FilterCondition]) -> CompiledFilter<T> {
    Compiler::default().compile_filter(conditions)
}

/// Compiles sort keys with the default [`Compiler`].
pub fn compile_order<T: Filterable>(specs: &[OrderSpec]) -> Result<CompiledOrder<T>> {
    Compiler::default().compile_order(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Predicate;
    use crate::error::FilterError;
    use crate::labels::LabelTable;
    use crate::schema::{EnumDescriptor, EnumVariant, FieldDef, Schema, TypeTag};
    use crate::value::Value;

    static LEVEL: EnumDescriptor = EnumDescriptor {
        name: "Level",
        variants: &[
            EnumVariant {
                name: "Low",
                value: 0,
                label: None,
            },
            EnumVariant {
                name: "High",
                value: 1,
                label: None,
            },
        ],
    };

    fn level() -> &'static EnumDescriptor {
        &LEVEL
    }

    struct Alert {
        title: String,
        level: i64,
    }

    impl Filterable for Alert {
        fn schema() -> &'static Schema {
            static SCHEMA: Schema = Schema {
                name: "Alert",
                fields: &[
                    FieldDef {
                        name: "title",
                        ty: TypeTag::String,
                        nullable: false,
                    },
                    FieldDef {
                        name: "level",
                        ty: TypeTag::Enum(level),
                        nullable: false,
                    },
                ],
            };
            &SCHEMA
        }

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "title" => Value::String(&self.title),
                "level" => Value::Enum(self.level),
                _ => Value::None,
            }
        }
    }

    fn alert(title: &str, level: i64) -> Alert {
        Alert {
            title: title.to_string(),
            level,
        }
    }

    #[test]
    fn text_match_setting_applies() {
        let conditions = [FilterCondition::new("title", "contains", "Disk")];
        let lower = alert("disk full", 1);

        let insensitive = compile_filter::<Alert>(&conditions);
        assert!(insensitive.matches(&lower));

        let sensitive = Compiler::new()
            .text_match(TextMatch::CaseSensitive)
            .compile_filter::<Alert>(&conditions);
        assert!(!sensitive.matches(&lower));
        assert!(sensitive.matches(&alert("Disk full", 1)));
    }

    #[test]
    fn label_provider_setting_applies() {
        let mut table = LabelTable::new();
        table.insert_raw(&LEVEL, 1, "Critical");
        let compiler = Compiler::new().with_labels(Arc::new(table));

        let conditions = [FilterCondition::new("level", "eq", "crit")];
        let filter = compiler.compile_filter::<Alert>(&conditions);
        assert!(filter.matches(&alert("cpu", 1)));
        assert!(!filter.matches(&alert("cpu", 0)));

        let declared = compile_filter::<Alert>(&conditions);
        assert_eq!(declared.predicate(), &Predicate::False);
    }

    #[test]
    fn order_compilation_fails_fast() {
        let specs = [OrderSpec::asc("title"), OrderSpec::desc("severity")];
        let err = compile_order::<Alert>(&specs).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownProperty {
                path: "severity".to_string(),
                record: "Alert",
            }
        );

        let order = compile_order::<Alert>(&specs[..1]).unwrap();
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn compiler_is_shareable() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Compiler>();
        assert_send_sync::<CompiledFilter<Alert>>();
        assert_send_sync::<CompiledOrder<Alert>>();
    }
}
