//! Display labels for enum values.
//!
//! Enum-typed properties can be searched by their human-readable label
//! instead of their stored value. Labels come from a [`LabelProvider`]; the
//! compiler only reads from it.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::trace;

use crate::schema::EnumDescriptor;
use crate::traits::FilterEnum;

/// Source of display labels for enum values.
///
/// Returning `None` makes the matcher fall back to the variant name.
/// Closures of the shape `Fn(&EnumDescriptor, i64) -> Option<String>` are
/// providers too.
pub trait LabelProvider: Send + Sync {
    fn label_of(&self, descriptor: &EnumDescriptor, value: i64) -> Option<Cow<'_, str>>;
}

/// Labels declared on the enum itself (`#[filter(label = "...")]`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredLabels;

impl LabelProvider for DeclaredLabels {
    fn label_of(&self, descriptor: &EnumDescriptor, value: i64) -> Option<Cow<'_, str>> {
        descriptor
            .variant(value)
            .and_then(|variant| variant.label)
            .map(Cow::Borrowed)
    }
}

/// Externally owned label table, e.g. loaded from a translation catalog.
///
/// Entries are keyed by the enum's descriptor, so two enums sharing a type
/// name in different modules keep separate labels. Values without an entry
/// fall back to the declared labels.
///
/// ```
/// use sieve::{FilterEnum, LabelProvider, LabelTable};
///
/// #[derive(FilterEnum)]
/// enum Role {
///     Admin,
///     Member,
/// }
///
/// let labels = LabelTable::new().with(Role::Admin, "مدیر");
/// let label = labels.label_of(Role::descriptor(), Role::Admin.discriminant());
/// assert_eq!(label.as_deref(), Some("مدیر"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    entries: HashMap<(usize, i64), String>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable::default()
    }

    /// Registers a label for an enum value.
    pub fn with<E: FilterEnum>(mut self, value: E, label: impl Into<String>) -> Self {
        self.insert(value, label);
        self
    }

    /// Registers a label for an enum value.
    pub fn insert<E: FilterEnum>(&mut self, value: E, label: impl Into<String>) {
        self.insert_raw(E::descriptor(), value.discriminant(), label);
    }

    /// Registers a label by descriptor and stored value.
    pub fn insert_raw(
        &mut self,
        descriptor: &'static EnumDescriptor,
        value: i64,
        label: impl Into<String>,
    ) {
        self.entries
            .insert((descriptor_key(descriptor), value), label.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LabelProvider for LabelTable {
    fn label_of(&self, descriptor: &EnumDescriptor, value: i64) -> Option<Cow<'_, str>> {
        match self.entries.get(&(descriptor_key(descriptor), value)) {
            Some(label) => Some(Cow::Borrowed(label.as_str())),
            None => DeclaredLabels.label_of(descriptor, value),
        }
    }
}

/// Descriptors are statics, one per enum type; the address identifies the type.
fn descriptor_key(descriptor: &EnumDescriptor) -> usize {
    std::ptr::from_ref(descriptor) as usize
}

impl<F> LabelProvider for F
where
    F: Fn(&EnumDescriptor, i64) -> Option<String> + Send + Sync,
{
    fn label_of(&self, descriptor: &EnumDescriptor, value: i64) -> Option<Cow<'_, str>> {
        self(descriptor, value).map(Cow::Owned)
    }
}

/// Returns every value of the enum whose label contains `needle`,
/// ignoring case.
///
/// Variants without a label are matched by their symbolic name.
pub fn match_by_label(
    descriptor: &EnumDescriptor,
    labels: &dyn LabelProvider,
    needle: &str,
) -> Vec<i64> {
    let needle = needle.to_lowercase();
    let matches: Vec<i64> = descriptor
        .variants
        .iter()
        .filter(|variant| {
            let label = labels
                .label_of(descriptor, variant.value)
                .unwrap_or(Cow::Borrowed(variant.name));
            label.to_lowercase().contains(&needle)
        })
        .map(|variant| variant.value)
        .collect();

    trace!(
        enum_name = descriptor.name,
        needle = %needle,
        matches = matches.len(),
        "matched enum labels"
    );
    matches
}
