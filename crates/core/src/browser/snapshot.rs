use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::CatalogEntry;
use crate::filter::FilterSpec;
use crate::pagination::PageLink;

/// Lifecycle of a session. `Failed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
pub enum SessionPhase {
    Loading,
    Ready,
    Failed(String),
}

/// An entry as shown on the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCard {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub favorite: bool,
}

/// Values offered by the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub subjects: Vec<String>,
    pub difficulties: Vec<String>,
    pub sources: Vec<String>,
    pub grades: Vec<String>,
}

impl FilterOptions {
    /// Sorted distinct subjects, difficulties and sources of `entries`.
    /// Grades are a fixed list.
    pub fn collect(entries: &[CatalogEntry], grades: &[String]) -> Self {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        }

        Self {
            subjects: distinct(entries.iter().map(|e| e.subject.as_str())),
            difficulties: distinct(entries.iter().map(|e| e.difficulty.as_str())),
            sources: distinct(entries.iter().map(|e| e.source.as_str())),
            grades: grades.to_vec(),
        }
    }
}

/// Everything the page needs to render, as a plain value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseSnapshot {
    pub phase: SessionPhase,
    /// Shown with a reload action when the catalog could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_hint: Option<String>,
    pub items: Vec<EntryCard>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Entries matching the active filters, across all pages.
    pub total_matches: usize,
    pub page_links: Vec<PageLink>,
    pub detail: Option<EntryCard>,
    pub filter_options: FilterOptions,
    pub filters: FilterSpec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::EntryBuilder;

    #[test]
    fn test_filter_options_are_sorted_and_distinct() {
        let entries = vec![
            EntryBuilder::new("a").subject("物理").difficulty("困难").source("模拟").build(),
            EntryBuilder::new("b").subject("数学").difficulty("中等").source("真题").build(),
            EntryBuilder::new("c").subject("数学").difficulty("中等").build(),
        ];
        let grades = vec!["高一".to_string(), "高三".to_string()];

        let options = FilterOptions::collect(&entries, &grades);
        assert_eq!(options.subjects, vec!["数学", "物理"]);
        assert_eq!(options.difficulties, vec!["中等", "困难"]);
        assert_eq!(options.sources, vec!["模拟", "真题"]);
        assert_eq!(options.grades, grades);
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_value(SessionPhase::Failed("boom".into())).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");
    }
}
