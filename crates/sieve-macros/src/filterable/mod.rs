//! Implementation of the `#[derive(Filterable)]` and `#[derive(FilterEnum)]`
//! macros.
//!
//! Both macros read `#[filter(...)]` attributes and emit static descriptions
//! that the sieve compiler walks instead of runtime reflection.

mod attrs;
mod derive;

pub use derive::{filter_enum_derive_impl, filterable_derive_impl};
