use serde::{Deserialize, Serialize};

/// User-chosen constraints narrowing the catalog.
///
/// Empty strings mean "unset", same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive substring search.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn favorites_only(mut self, on: bool) -> Self {
        self.favorites_only = on;
        self
    }

    /// The search needle as matched: trimmed and lowercased. `None` when
    /// there is nothing to search for.
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.search_needle().is_none()
            && active(&self.subject).is_none()
            && active(&self.difficulty).is_none()
            && active(&self.source).is_none()
            && active(&self.grade).is_none()
            && !self.favorites_only
    }
}

/// An equality constraint, if it is actually set.
pub(crate) fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// A one-click filter as configured on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickFilter {
    /// Clear every constraint.
    All,
    /// Restrict to one subject.
    Subject(String),
    /// Search for a tag.
    Tag(String),
}

impl QuickFilter {
    /// Parse `all`, `subject:<value>` or `tag:<value>`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == "all" {
            return Some(Self::All);
        }
        let (kind, value) = raw.split_once(':')?;
        if value.is_empty() {
            return None;
        }
        match kind {
            "subject" => Some(Self::Subject(value.to_string())),
            "tag" => Some(Self::Tag(value.to_string())),
            _ => None,
        }
    }

    /// Apply on top of `spec`. `All` resets; the others change one
    /// dimension and keep the rest.
    pub fn apply(&self, spec: &FilterSpec) -> FilterSpec {
        match self {
            Self::All => FilterSpec::default(),
            Self::Subject(subject) => FilterSpec {
                subject: Some(subject.clone()),
                ..spec.clone()
            },
            Self::Tag(tag) => FilterSpec {
                search: tag.clone(),
                ..spec.clone()
            },
        }
    }
}
