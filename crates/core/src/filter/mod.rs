//! Filtering and ordering of the catalog.

mod engine;
mod spec;

pub use engine::{compute_view, matches, FilteredView};
pub use spec::{FilterSpec, QuickFilter};
