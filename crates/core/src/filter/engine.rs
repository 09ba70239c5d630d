use std::cmp::Ordering;

use super::spec::{active, FilterSpec};
use crate::catalog::CatalogEntry;
use crate::favorites::FavoritesSet;

/// The ordered subset of the catalog matching a [`FilterSpec`].
///
/// Holds positions into the collection it was computed from, so it is
/// always a subset of that collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    positions: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions into the source collection, in view order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Resolve the view against the collection it was computed from.
    pub fn entries<'a>(
        &'a self,
        all: &'a [CatalogEntry],
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.positions.iter().filter_map(move |&pos| all.get(pos))
    }

    /// Entries of the half-open range `range` of the view.
    pub fn slice<'a>(
        &'a self,
        all: &'a [CatalogEntry],
        range: std::ops::Range<usize>,
    ) -> Vec<&'a CatalogEntry> {
        let end = range.end.min(self.positions.len());
        let start = range.start.min(end);
        self.positions[start..end]
            .iter()
            .filter_map(|&pos| all.get(pos))
            .collect()
    }
}

/// Whether `entry` satisfies every constraint of `spec`.
///
/// Dimensions are checked cheapest first and short-circuit: search text,
/// subject, difficulty, source, grade, favorites-only.
pub fn matches(entry: &CatalogEntry, favorites: &FavoritesSet, spec: &FilterSpec) -> bool {
    if let Some(needle) = spec.search_needle() {
        if !haystack(entry).contains(&needle) {
            return false;
        }
    }
    if let Some(subject) = active(&spec.subject) {
        if entry.subject != subject {
            return false;
        }
    }
    if let Some(difficulty) = active(&spec.difficulty) {
        if entry.difficulty != difficulty {
            return false;
        }
    }
    if let Some(source) = active(&spec.source) {
        if entry.source != source {
            return false;
        }
    }
    if let Some(grade) = active(&spec.grade) {
        if entry.grade.as_deref() != Some(grade) {
            return false;
        }
    }
    if spec.favorites_only && !favorites.contains(&entry.id) {
        return false;
    }
    true
}

/// Lowercased name, description, subject and tags joined by spaces.
fn haystack(entry: &CatalogEntry) -> String {
    let tags = entry.tags.join(" ");
    [
        entry.name.as_str(),
        entry.description.as_str(),
        entry.subject.as_str(),
        tags.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Filter and order `entries`.
///
/// Favorited entries come first, then higher download counts. The sort is
/// stable, so ties keep their collection order.
pub fn compute_view(
    entries: &[CatalogEntry],
    favorites: &FavoritesSet,
    spec: &FilterSpec,
) -> FilteredView {
    let mut positions: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches(entry, favorites, spec))
        .map(|(pos, _)| pos)
        .collect();

    positions.sort_by(|&a, &b| compare(&entries[a], &entries[b], favorites));

    FilteredView { positions }
}

fn compare(a: &CatalogEntry, b: &CatalogEntry, favorites: &FavoritesSet) -> Ordering {
    let a_fav = favorites.contains(&a.id);
    let b_fav = favorites.contains(&b.id);
    b_fav
        .cmp(&a_fav)
        .then_with(|| b.downloads.cmp(&a.downloads))
}
