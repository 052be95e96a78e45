//! Sieve - compiles client-supplied filter and sort specifications into typed
//! predicates and comparators over Rust record types.
//!
//! API clients describe searches as data: a list of conditions (property,
//! operator, value, and/or logic) and a list of sort keys. Sieve checks each
//! property against the record's schema, coerces the textual values to the
//! property's type, and produces:
//!
//! - a [`CompiledFilter`]: an immutable predicate tree, evaluated per record
//! - a [`CompiledOrder`]: a multi-key comparator with nulls always last and
//!   collation-aware string ordering
//!
//! [`Query`] runs both over in-memory collections, with paging.
//!
//! # Quick Start
//!
//! ```rust
//! use sieve::{Compiler, FilterCondition, FilterEnum, Filterable, OrderSpec};
//!
//! #[derive(FilterEnum)]
//! enum Status {
//!     #[filter(label = "Available")]
//!     Vacant,
//!     #[filter(label = "Rented out")]
//!     Occupied,
//! }
//!
//! #[derive(Filterable)]
//! struct Unit {
//!     #[filter(String)]
//!     title: String,
//!     #[filter(Int)]
//!     rent: u32,
//!     #[filter(Enum)]
//!     status: Status,
//! }
//!
//! let units = vec![
//!     Unit { title: "Loft".into(), rent: 1200, status: Status::Vacant },
//!     Unit { title: "Studio".into(), rent: 800, status: Status::Occupied },
//!     Unit { title: "Attic".into(), rent: 650, status: Status::Vacant },
//! ];
//!
//! let compiler = Compiler::new();
//! let filter = compiler.compile_filter::<Unit>(&[
//!     FilterCondition::new("status", "contains", "avail"),
//!     FilterCondition::range("rent", "between", "500", "1000"),
//! ]);
//! let order = compiler.compile_order::<Unit>(&[OrderSpec::asc("title")])?;
//!
//! let mut found: Vec<&Unit> = units.iter().filter(|u| filter.matches(u)).collect();
//! order.sort_refs(&mut found);
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].title, "Attic");
//! # Ok::<(), sieve::FilterError>(())
//! ```
//!
//! # Filter Semantics
//!
//! Conditions on the same property form a group combined with that group's
//! logic; groups are always combined with AND:
//!
//! ```text
//! match = group(p1) ∧ group(p2) ∧ ...
//! group = c1 ∧ c2 ∧ ...    (default)
//!       | c1 ∨ c2 ∨ ...    (first condition has logic "or")
//! ```
//!
//! A condition that cannot be compiled (unknown property or operator, bad
//! value, operator not valid for the type) is left out and listed in
//! [`CompiledFilter::skipped`]. Sort keys are strict: an unknown property is
//! a [`FilterError`].
//!
//! # Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | `contains`, `notcontains`, `startswith`, `endswith`, `eq`, `neq` |
//! | Int, Float, Decimal | `eq`, `neq`, `gt`, `gte`, `lt`, `lte`, `between`, `notbetween` |
//! | DateTime | as numbers; `eq`/`neq` compare calendar dates |
//! | Enum | `eq`/`contains` by display label, `neq` by name or value |
//! | Bool, Guid | `eq`, `neq` |
//! | Any | `isempty`, `isnotempty` |

mod builder;
mod clause;
mod coerce;
mod collation;
mod compiler;
mod error;
mod filter;
mod labels;
mod op;
mod ordering;
mod query;
mod request;
mod resolve;
mod schema;
mod traits;
mod value;

// Re-export public API
pub use builder::{build, BuildContext};
pub use clause::{Clause, ClauseValue, Predicate, Test, TextMatch, TextOp};
pub use coerce::coerce;
pub use collation::{Collation, FoldedCollation, OrdinalCollation};
pub use compiler::{compile_filter, compile_order, Compiler};
pub use error::{CoercionError, FilterError, Result, Skip};
pub use filter::{CompiledFilter, FilterCondition, Logic, SkippedCondition};
pub use labels::{match_by_label, DeclaredLabels, LabelProvider, LabelTable};
pub use op::Op;
pub use ordering::{compare_values, CompiledOrder, Dir, OrderKey, OrderSpec};
pub use query::{Page, PageRequest, Query, Queryable, DEFAULT_PAGE_SIZE};
pub use request::SearchRequest;
pub use resolve::{read_path, resolve, resolve_in, ResolvedProperty};
pub use schema::{EnumDescriptor, EnumRef, EnumVariant, FieldDef, Schema, SchemaRef, TypeTag};
pub use traits::{FilterEnum, Filterable, IntoValue};
pub use value::{Number, Value};

#[cfg(feature = "derive")]
pub use sieve_macros::{FilterEnum, Filterable};
