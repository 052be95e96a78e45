//! Ordering of records.
//!
//! Provides [`Dir`] for sort direction, [`OrderSpec`] for client-supplied
//! sort keys, and [`CompiledOrder`] for multi-key comparison.
//!
//! Null values always sort after non-null values, whatever the direction of
//! the key. Strings are compared with the order's [`Collation`].

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collation::{Collation, FoldedCollation};
use crate::error::{FilterError, Result};
use crate::resolve::{read_path, resolve};
use crate::schema::TypeTag;
use crate::traits::Filterable;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns the direction for a `descending` flag.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client-supplied sort key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
    /// Dotted property path.
    #[serde(alias = "property_name", alias = "property")]
    pub property_name: String,
    #[serde(default)]
    pub descending: bool,
}

impl OrderSpec {
    /// Creates an ascending key for the given property.
    pub fn asc(property_name: impl Into<String>) -> Self {
        OrderSpec {
            property_name: property_name.into(),
            descending: false,
        }
    }

    /// Creates a descending key for the given property.
    pub fn desc(property_name: impl Into<String>) -> Self {
        OrderSpec {
            property_name: property_name.into(),
            descending: true,
        }
    }

    pub fn dir(&self) -> Dir {
        Dir::from_descending(self.descending)
    }
}

/// One resolved sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub path: Vec<&'static str>,
    pub dir: Dir,
    /// Whether the property can be null.
    pub nulls_last: bool,
    pub ty: TypeTag,
}

impl OrderKey {
    fn compare(
        &self,
        a: &dyn Filterable,
        b: &dyn Filterable,
        collation: &dyn Collation,
    ) -> Ordering {
        let left = read_path(a, &self.path);
        let right = read_path(b, &self.path);

        match (sorts_last(&left), sorts_last(&right)) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        compare_values(&left, &right, collation)
            .map(|ordering| self.dir.apply(ordering))
            .unwrap_or(Ordering::Equal)
    }
}

/// Nulls and NaNs have no place in the value order; they go after it in
/// either direction.
fn sorts_last(value: &Value<'_>) -> bool {
    match value {
        Value::None => true,
        Value::Number(n) => n.is_nan(),
        _ => false,
    }
}

/// Compares two values of the same type.
///
/// Returns `None` if the types don't match or comparison is not possible
/// (NaN, nulls, records).
pub fn compare_values(
    a: &Value<'_>,
    b: &Value<'_>,
    collation: &dyn Collation,
) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(collation.compare(a, b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Guid(a), Value::Guid(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Compiled multi-key ordering for records of type `T`.
///
/// The first key is the primary sort key, each further key breaks ties left
/// by the keys before it.
///
/// ```
/// use sieve::{CompiledOrder, Filterable};
///
/// #[derive(Filterable)]
/// struct Track {
///     #[filter(String)]
///     artist: String,
///     #[filter(Int)]
///     year: i32,
/// }
///
/// let order = CompiledOrder::<Track>::new()
///     .then_by("artist", false)?
///     .then_by("year", true)?;
///
/// let mut tracks = vec![
///     Track { artist: "Shajarian".into(), year: 1977 },
///     Track { artist: "Googoosh".into(), year: 1974 },
///     Track { artist: "Shajarian".into(), year: 1982 },
/// ];
/// order.sort(&mut tracks);
/// assert_eq!(tracks[0].artist, "Googoosh");
/// assert_eq!(tracks[1].year, 1982);
/// # Ok::<(), sieve::FilterError>(())
/// ```
pub struct CompiledOrder<T> {
    keys: Vec<OrderKey>,
    collation: Arc<dyn Collation>,
    _record: PhantomData<fn(&T, &T) -> Ordering>,
}

impl<T> CompiledOrder<T> {
    /// Creates an empty order using [`FoldedCollation`].
    pub fn new() -> Self {
        CompiledOrder::with_collation(Arc::new(FoldedCollation))
    }

    /// Creates an empty order using the given collation for strings.
    pub fn with_collation(collation: Arc<dyn Collation>) -> Self {
        CompiledOrder {
            keys: Vec::new(),
            collation,
            _record: PhantomData,
        }
    }

    pub fn keys(&self) -> &[OrderKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if this order has no keys (keeps input order).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn collation(&self) -> &dyn Collation {
        self.collation.as_ref()
    }
}

impl<T: Filterable> CompiledOrder<T> {
    /// Appends a key for the dotted `path`.
    ///
    /// Fails with [`FilterError::UnknownProperty`] if the path does not
    /// resolve, and with [`FilterError::NotSortable`] for record-typed
    /// properties.
    pub fn then_by(mut self, path: &str, descending: bool) -> Result<Self> {
        let property = resolve::<T>(path)?;
        if !property.declared_type.is_sortable() {
            return Err(FilterError::NotSortable {
                path: path.to_string(),
                ty: property.declared_type.name(),
            });
        }
        self.keys.push(OrderKey {
            path: property.path,
            dir: Dir::from_descending(descending),
            nulls_last: property.is_nullable,
            ty: property.declared_type,
        });
        Ok(self)
    }

    /// Appends a key from an [`OrderSpec`].
    pub fn then_by_spec(self, spec: &OrderSpec) -> Result<Self> {
        self.then_by(&spec.property_name, spec.descending)
    }

    /// Compares two records key by key.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let collation = self.collation.as_ref();
        self.keys
            .iter()
            .map(|key| key.compare(a, b, collation))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sorts records in place. The sort is stable.
    pub fn sort(&self, items: &mut [T]) {
        if !self.keys.is_empty() {
            items.sort_by(|a, b| self.compare(a, b));
        }
    }

    /// Sorts references in place. The sort is stable.
    pub fn sort_refs(&self, items: &mut [&T]) {
        if !self.keys.is_empty() {
            items.sort_by(|a, b| self.compare(a, b));
        }
    }

    /// Converts this order into a plain comparator.
    pub fn into_fn(self) -> impl Fn(&T, &T) -> Ordering + Send + Sync + Clone {
        let order = Arc::new(self);
        move |a: &T, b: &T| order.compare(a, b)
    }
}

impl<T> Default for CompiledOrder<T> {
    fn default() -> Self {
        CompiledOrder::new()
    }
}

impl<T> Clone for CompiledOrder<T> {
    fn clone(&self) -> Self {
        CompiledOrder {
            keys: self.keys.clone(),
            collation: Arc::clone(&self.collation),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CompiledOrder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledOrder")
            .field("keys", &self.keys)
            .field("collation", &self.collation)
            .finish()
    }
}
