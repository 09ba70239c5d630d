//! Testing utilities: entry fixtures and an in-memory catalog source.
//!
//! # Example
//!
//! ```rust,ignore
//! use exam_catalog_core::testing::{fixtures, MockCatalogSource};
//!
//! let source = MockCatalogSource::new(vec![
//!     fixtures::EntryBuilder::new("exam-1").subject("数学").downloads(10).build(),
//! ]);
//! session.start(&source).await?;
//! ```

mod mock_source;

pub use mock_source::MockCatalogSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogEntry;

    /// Entry with the given id and a name derived from it.
    pub fn entry(id: &str) -> CatalogEntry {
        EntryBuilder::new(id).build()
    }

    /// `count` entries `exam-00 ..` with strictly decreasing downloads, so
    /// the default ordering equals collection order.
    pub fn numbered_entries(count: usize) -> Vec<CatalogEntry> {
        (0..count)
            .map(|i| {
                EntryBuilder::new(&format!("exam-{:02}", i))
                    .downloads((count - i) as u64 * 10)
                    .build()
            })
            .collect()
    }

    /// Builder for catalog entries with reasonable defaults.
    #[derive(Debug, Clone)]
    pub struct EntryBuilder {
        entry: CatalogEntry,
    }

    impl EntryBuilder {
        pub fn new(id: &str) -> Self {
            let mut entry = CatalogEntry::new(id, format!("Exam {}", id));
            entry.file_url = format!("./uploads/files/{}.pdf", id);
            entry.file_format = "PDF".to_string();
            entry.file_size = 1024 * 1024;
            Self { entry }
        }

        pub fn name(mut self, name: &str) -> Self {
            self.entry.name = name.to_string();
            self
        }

        pub fn description(mut self, description: &str) -> Self {
            self.entry.description = description.to_string();
            self
        }

        pub fn subject(mut self, subject: &str) -> Self {
            self.entry.subject = subject.to_string();
            self
        }

        pub fn difficulty(mut self, difficulty: &str) -> Self {
            self.entry.difficulty = difficulty.to_string();
            self
        }

        pub fn source(mut self, source: &str) -> Self {
            self.entry.source = source.to_string();
            self
        }

        pub fn grade(mut self, grade: &str) -> Self {
            self.entry.grade = Some(grade.to_string());
            self
        }

        pub fn year(mut self, year: i32) -> Self {
            self.entry.year = Some(year);
            self
        }

        pub fn downloads(mut self, downloads: u64) -> Self {
            self.entry.downloads = downloads;
            self
        }

        pub fn views(mut self, views: u64) -> Self {
            self.entry.views = views;
            self
        }

        pub fn tags(mut self, tags: &[&str]) -> Self {
            self.entry.tags = tags.iter().map(|t| t.to_string()).collect();
            self
        }

        pub fn knowledge_points(mut self, points: &[&str]) -> Self {
            self.entry.knowledge_points = points.iter().map(|p| p.to_string()).collect();
            self
        }

        pub fn file_url(mut self, url: &str) -> Self {
            self.entry.file_url = url.to_string();
            self
        }

        pub fn upload_date(mut self, date: &str) -> Self {
            self.entry.upload_date = Some(date.to_string());
            self
        }

        pub fn build(self) -> CatalogEntry {
            self.entry
        }
    }
}
